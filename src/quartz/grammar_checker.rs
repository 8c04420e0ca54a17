use std::fmt;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{Graph, NodeIndex};

use string_builder::Builder;

use crate::quartz::error::CompileError;
use crate::quartz::token::{Token, TokenKind};
use crate::util::quartz_log;

// The grammar symbols that can label a derivation node
#[derive (Debug, Clone, Copy, PartialEq, strum::Display)]
pub enum GrammarSymbol {
    S,
    E,
    T,
    F,
    G,
    H,
    I,
    #[strum (serialize = "ID")]
    Id,
    #[strum (serialize = "NUM")]
    Num,
    #[strum (serialize = "STRING")]
    Str
}

pub enum DerivationNode {
    NonTerminal(GrammarSymbol),
    Terminal(String)
}

// Custom Debug so the dot output labels nodes with their symbol
impl fmt::Debug for DerivationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            DerivationNode::NonTerminal(symbol) => write!(f, "{}", symbol),
            DerivationNode::Terminal(text) => write!(f, "{}", text)
        }
    }
}

// The general-arity parse tree the recursive descent produces. It exists
// for diagnostics and cross-validation only; nothing downstream consumes it.
#[derive (Debug)]
pub struct DerivationTree {
    pub graph: Graph<DerivationNode, ()>,
    pub root: Option<usize>
}

impl DerivationTree {
    pub fn new() -> Self {
        return DerivationTree {
            graph: Graph::new(),
            root: None
        };
    }

    fn add_nonterminal(&mut self, symbol: GrammarSymbol) -> NodeIndex {
        return self.graph.add_node(DerivationNode::NonTerminal(symbol));
    }

    fn add_terminal(&mut self, text: &str) -> NodeIndex {
        return self.graph.add_node(DerivationNode::Terminal(String::from(text)));
    }

    fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.add_edge(parent, child, ());
    }

    // The children of a node in left-to-right order
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let neighbors: Vec<NodeIndex> = self.graph.neighbors(index).collect();
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
        for _i in 0..level {
            builder.append("-");
        }

        match &self.graph[cur_index] {
            DerivationNode::Terminal(text) => builder.append(format!("[{}]\n", text)),
            DerivationNode::NonTerminal(symbol) => builder.append(format!("<{}>\n", symbol))
        }

        for child_index in self.children(cur_index) {
            self.to_text_dfs(builder, child_index, level + 1);
        }
    }

    pub fn to_dot(&self) -> String {
        let graph_dot: Dot<&Graph<DerivationNode, ()>> = Dot::with_config(&self.graph, &[Config::EdgeNoLabel]);
        return format!("{:?}", graph_dot);
    }
}

// Recursive-descent validator for the grammar
//
//   S -> ID ':=' E
//   E -> T {('and'|'or') T}
//   T -> F {relop F}
//   F -> G {('+'|'-') G}
//   G -> H {('*'|'/') H}
//   H -> 'not' H | I
//   I -> ID | CONST | STRING | '(' E ')'
//
// It runs over the same token stream as the syntax tree builder but is
// completely independent of it.
pub struct GrammarChecker<'a> {
    tokens: &'a [Token],
    pos: usize,
    tree: DerivationTree
}

const RELATIONAL_OPERATORS: [&str; 6] = ["=", "<", ">", "<=", ">=", "<>"];

impl<'a> GrammarChecker<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        return GrammarChecker {
            tokens,
            pos: 0,
            tree: DerivationTree::new()
        };
    }

    // Runs the full derivation. A failure comes back as a structured
    // diagnostic result; this entry point never panics and never leaves an
    // error for the caller to catch.
    pub fn analyze(mut self) -> Result<DerivationTree, CompileError> {
        let root: NodeIndex = self.statement()?;

        // The statement has to consume the whole stream
        if let Some(extra) = self.current() {
            return Err(CompileError::TrailingTokens { token: extra.text.to_owned() });
        }

        self.tree.root = Some(root.index());
        quartz_log::log(
            quartz_log::LogTypes::Info,
            quartz_log::LogSources::GrammarChecker,
            String::from("The token stream derives from the grammar")
        );
        return Ok(self.tree);
    }

    fn current(&self) -> Option<&Token> {
        return self.tokens.get(self.pos);
    }

    // The text of the current token, for error messages
    fn found(&self) -> String {
        return match self.current() {
            Some(token) => format!("{}", token),
            None => String::from("end of input")
        };
    }

    // Whether the current token is an operator with one of the given symbols
    fn at_operator(&self, symbols: &[&str]) -> bool {
        return match self.current() {
            Some(token) => {
                token.kind == TokenKind::Operator && symbols.iter().any(|s| *s == token.text)
            },
            None => false
        };
    }

    fn consume(&mut self, expected_kind: TokenKind) -> Result<Token, CompileError> {
        match self.current() {
            Some(token) if token.kind == expected_kind => {
                let consumed: Token = token.to_owned();
                self.pos += 1;
                return Ok(consumed);
            },
            _ => {
                return Err(CompileError::Syntax {
                    expected: format!("{}", expected_kind),
                    found: self.found()
                });
            }
        }
    }

    // S -> ID ':=' E
    fn statement(&mut self) -> Result<NodeIndex, CompileError> {
        let root: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::S);

        let id_token: Token = self.consume(TokenKind::Identifier)?;
        let id_node: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::Id);
        let id_leaf: NodeIndex = self.tree.add_terminal(&id_token.text);
        self.tree.add_child(id_node, id_leaf);
        self.tree.add_child(root, id_node);

        if !self.at_operator(&[":="]) {
            return Err(CompileError::Syntax {
                expected: String::from("the assignment operator ':='"),
                found: self.found()
            });
        }
        self.pos += 1;
        let assign_leaf: NodeIndex = self.tree.add_terminal(":=");
        self.tree.add_child(root, assign_leaf);

        let expression: NodeIndex = self.expression()?;
        self.tree.add_child(root, expression);

        return Ok(root);
    }

    // E -> T {('and'|'or') T}
    fn expression(&mut self) -> Result<NodeIndex, CompileError> {
        let mut node: NodeIndex = self.comparison()?;

        while self.at_operator(&["and", "or"]) {
            let op_text: String = self.current().unwrap().text.to_owned();
            self.pos += 1;

            let parent: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::E);
            let op_leaf: NodeIndex = self.tree.add_terminal(&op_text);
            let right: NodeIndex = self.comparison()?;
            self.tree.add_child(parent, node);
            self.tree.add_child(parent, op_leaf);
            self.tree.add_child(parent, right);
            node = parent;
        }

        return Ok(node);
    }

    // T -> F {relop F}
    fn comparison(&mut self) -> Result<NodeIndex, CompileError> {
        let mut node: NodeIndex = self.additive()?;

        while self.at_operator(&RELATIONAL_OPERATORS) {
            let op_text: String = self.current().unwrap().text.to_owned();
            self.pos += 1;

            let parent: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::T);
            let op_leaf: NodeIndex = self.tree.add_terminal(&op_text);
            let right: NodeIndex = self.additive()?;
            self.tree.add_child(parent, node);
            self.tree.add_child(parent, op_leaf);
            self.tree.add_child(parent, right);
            node = parent;
        }

        return Ok(node);
    }

    // F -> G {('+'|'-') G}
    fn additive(&mut self) -> Result<NodeIndex, CompileError> {
        let mut node: NodeIndex = self.multiplicative()?;

        while self.at_operator(&["+", "-"]) {
            let op_text: String = self.current().unwrap().text.to_owned();
            self.pos += 1;

            let parent: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::F);
            let op_leaf: NodeIndex = self.tree.add_terminal(&op_text);
            let right: NodeIndex = self.multiplicative()?;
            self.tree.add_child(parent, node);
            self.tree.add_child(parent, op_leaf);
            self.tree.add_child(parent, right);
            node = parent;
        }

        return Ok(node);
    }

    // G -> H {('*'|'/') H}
    fn multiplicative(&mut self) -> Result<NodeIndex, CompileError> {
        let mut node: NodeIndex = self.negation()?;

        while self.at_operator(&["*", "/"]) {
            let op_text: String = self.current().unwrap().text.to_owned();
            self.pos += 1;

            let parent: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::G);
            let op_leaf: NodeIndex = self.tree.add_terminal(&op_text);
            let right: NodeIndex = self.negation()?;
            self.tree.add_child(parent, node);
            self.tree.add_child(parent, op_leaf);
            self.tree.add_child(parent, right);
            node = parent;
        }

        return Ok(node);
    }

    // H -> 'not' H | I
    fn negation(&mut self) -> Result<NodeIndex, CompileError> {
        if self.at_operator(&["not"]) {
            self.pos += 1;

            let parent: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::H);
            let op_leaf: NodeIndex = self.tree.add_terminal("not");
            let child: NodeIndex = self.negation()?;
            self.tree.add_child(parent, op_leaf);
            self.tree.add_child(parent, child);
            return Ok(parent);
        }

        return self.primary();
    }

    // I -> ID | CONST | STRING | '(' E ')'
    fn primary(&mut self) -> Result<NodeIndex, CompileError> {
        let current: Option<(TokenKind, String)> = self.current().map(|t| (t.kind, t.text.to_owned()));
        let node: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::I);

        match current {
            Some((TokenKind::Paren, text)) if text == "(" => {
                self.pos += 1;

                let inner: NodeIndex = self.expression()?;
                self.tree.add_child(node, inner);

                let closing: bool = match self.current() {
                    Some(close) => close.kind == TokenKind::Paren && close.text == ")",
                    None => false
                };
                if !closing {
                    return Err(CompileError::Syntax {
                        expected: String::from("')'"),
                        found: self.found()
                    });
                }
                self.pos += 1;
            },
            Some((TokenKind::Identifier, text)) => {
                self.pos += 1;
                let id_node: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::Id);
                let leaf: NodeIndex = self.tree.add_terminal(&text);
                self.tree.add_child(id_node, leaf);
                self.tree.add_child(node, id_node);
            },
            Some((TokenKind::Constant, text)) => {
                self.pos += 1;
                let num_node: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::Num);
                let leaf: NodeIndex = self.tree.add_terminal(&text);
                self.tree.add_child(num_node, leaf);
                self.tree.add_child(node, num_node);
            },
            Some((TokenKind::StringLit, text)) => {
                self.pos += 1;
                let str_node: NodeIndex = self.tree.add_nonterminal(GrammarSymbol::Str);
                let leaf: NodeIndex = self.tree.add_terminal(&text);
                self.tree.add_child(str_node, leaf);
                self.tree.add_child(node, str_node);
            },
            _ => {
                return Err(CompileError::Syntax {
                    expected: String::from("IDENTIFIER, CONSTANT, STRING or '('"),
                    found: self.found()
                });
            }
        }

        return Ok(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quartz::lexer::Lexer;
    use crate::quartz::symbol_table::SymbolTable;

    fn tokens_of(source: &str) -> Vec<Token> {
        let mut symbols: SymbolTable = SymbolTable::new();
        return Lexer::new().tokenize(source, &mut symbols).unwrap();
    }

    fn check(source: &str) -> Result<DerivationTree, CompileError> {
        let tokens: Vec<Token> = tokens_of(source);
        return GrammarChecker::new(&tokens).analyze();
    }

    #[test]
    fn valid_statements_derive() {
        assert!(check("x := 1 + a + (b * c) + 3").is_ok());
        assert!(check("flag := not (a = b) and ok").is_ok());
        assert!(check("s := \"hi\" + \"there\"").is_ok());
    }

    #[test]
    fn derivation_root_is_the_start_symbol() {
        let tree: DerivationTree = check("x := 1").unwrap();
        let root = NodeIndex::new(tree.root.unwrap());
        assert!(matches!(tree.graph[root], DerivationNode::NonTerminal(GrammarSymbol::S)));
        // S has exactly the children ID, ':=', E
        assert_eq!(tree.children(root).len(), 3);
    }

    #[test]
    fn missing_assignment_operator_is_named() {
        let result = check("x");
        match result {
            Err(CompileError::Syntax { expected, .. }) => assert!(expected.contains(":=")),
            other => panic!("expected a syntax error, got {:?}", other)
        }
    }

    #[test]
    fn missing_identifier_is_a_syntax_error() {
        let result = check(":= 1");
        assert!(matches!(result, Err(CompileError::Syntax { .. })));
    }

    #[test]
    fn extra_tokens_are_rejected() {
        let result = check("x := 1 2");
        assert_eq!(result.err(), Some(CompileError::TrailingTokens { token: String::from("2") }));
    }

    #[test]
    fn unclosed_parenthesis_is_rejected() {
        let result = check("x := (1 + 2");
        match result {
            Err(CompileError::Syntax { expected, .. }) => assert!(expected.contains(")")),
            other => panic!("expected a syntax error, got {:?}", other)
        }
    }

    #[test]
    fn empty_stream_is_a_syntax_error() {
        let result = GrammarChecker::new(&[]).analyze();
        assert!(matches!(result, Err(CompileError::Syntax { .. })));
    }
}
