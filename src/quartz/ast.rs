use petgraph::dot::{Config, Dot};
use petgraph::graph::{Graph, NodeIndex};

use string_builder::Builder;

use crate::quartz::ast_node::{ExprNode, ExprNodeKind};

// The abstract syntax tree of one statement. Nodes live in a petgraph graph
// with edges from operators down to their operands.
#[derive (Debug)]
pub struct Ast {
    // A graph with the expression nodes as weights and no edge weights
    pub graph: Graph<ExprNode, ()>,

    // The root of the tree
    pub root: Option<usize>
}

impl Ast {
    // Constructor for an ast
    pub fn new() -> Self {
        return Ast {
            graph: Graph::new(),
            root: None
        };
    }

    // Adds a leaf node for an identifier or literal
    pub fn add_operand(&mut self, label: &str) -> NodeIndex {
        return self.graph.add_node(ExprNode::operand(label));
    }

    // Adds a unary operator above an existing child
    pub fn add_unary(&mut self, label: &str, child: NodeIndex) -> NodeIndex {
        let new_node: NodeIndex = self.graph.add_node(ExprNode::unary(label));
        self.graph.add_edge(new_node, child, ());
        return new_node;
    }

    // Adds a binary operator above two existing children. The left edge is
    // added first, so neighbors() walks right child then left child.
    pub fn add_binary(&mut self, label: &str, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        let new_node: NodeIndex = self.graph.add_node(ExprNode::binary(label));
        self.graph.add_edge(new_node, left, ());
        self.graph.add_edge(new_node, right, ());
        return new_node;
    }

    pub fn set_root(&mut self, root: NodeIndex) {
        self.root = Some(root.index());
    }

    // The children of a node in left-to-right order
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let neighbors: Vec<NodeIndex> = self.graph.neighbors(index).collect();
        // neighbors() yields most recently added first, so reverse it
        return neighbors.into_iter().rev().collect();
    }

    // Renders the tree as indented text, one node per line
    pub fn to_text(&self) -> String {
        let mut tree_builder: Builder = Builder::default();

        if let Some(root) = self.root {
            self.to_text_dfs(&mut tree_builder, NodeIndex::new(root), 0);
        }

        return tree_builder.string().unwrap_or_default();
    }

    fn to_text_dfs(&self, builder: &mut Builder, cur_index: NodeIndex, level: usize) {
        // Set the level
        for _i in 0..level {
            builder.append("-");
        }

        let node: &ExprNode = &self.graph[cur_index];
        match node.kind {
            ExprNodeKind::Operand => builder.append(format!("[{}]\n", node.label)),
            _ => builder.append(format!("<{}>\n", node.label))
        }

        // Walk each child in order
        for child_index in self.children(cur_index) {
            self.to_text_dfs(builder, child_index, level + 1);
        }
    }

    // Renders the tree in graphviz dot format for the report layer
    pub fn to_dot(&self) -> String {
        let graph_dot: Dot<&Graph<ExprNode, ()>> = Dot::with_config(&self.graph, &[Config::EdgeNoLabel]);
        return format!("{:?}", graph_dot);
    }
}
