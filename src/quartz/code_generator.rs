use log::debug;

use petgraph::graph::NodeIndex;

use crate::quartz::ast::Ast;
use crate::quartz::ast_node::ExprNodeKind;
use crate::util::quartz_log;

// One three-address instruction. Operands are literal text, identifier
// names, or back-references "(i)" to an earlier triple. A back-reference is
// always strictly earlier than the triple holding it, so the list reads as
// an execution-ordered evaluation plan.
#[derive (Debug, Clone, PartialEq)]
pub struct Triple {
    pub operator: String,
    pub operand1: String,
    // Unary operators leave this empty
    pub operand2: Option<String>
}

// Produces the intermediate representations from an annotated tree: the
// flat postfix listing and the triple list. The tree's shape invariants are
// trusted as-is; nothing here validates.
pub struct CodeGenerator {
    triples: Vec<Triple>
}

impl CodeGenerator {
    // Constructor for the code generator
    pub fn new() -> Self {
        return CodeGenerator {
            triples: Vec::new()
        };
    }

    // The pure post-order listing of leaf values and operator symbols.
    // Computable straight from the tree, no semantic annotation needed.
    pub fn postfix(ast: &Ast) -> Vec<String> {
        let mut output: Vec<String> = Vec::new();
        if let Some(root) = ast.root {
            Self::postfix_dfs(ast, NodeIndex::new(root), &mut output);
        }
        return output;
    }

    fn postfix_dfs(ast: &Ast, cur_index: NodeIndex, output: &mut Vec<String>) {
        for child_index in ast.children(cur_index) {
            Self::postfix_dfs(ast, child_index, output);
        }
        output.push(ast.graph[cur_index].label.to_owned());
    }

    // Generates the triple list by a post-order walk
    pub fn generate(&mut self, ast: &Ast) -> Vec<Triple> {
        self.triples.clear();

        if let Some(root) = ast.root {
            self.walk(ast, NodeIndex::new(root));
        }

        quartz_log::log(
            quartz_log::LogTypes::Info,
            quartz_log::LogSources::CodeGenerator,
            format!("Generated {} triples", self.triples.len())
        );
        return self.triples.clone();
    }

    // A leaf hands its own text to the parent; an operator emits a triple
    // over its children's results and hands back the reference to it
    fn walk(&mut self, ast: &Ast, cur_index: NodeIndex) -> String {
        let kind: ExprNodeKind = ast.graph[cur_index].kind;
        let label: String = ast.graph[cur_index].label.to_owned();

        match kind {
            ExprNodeKind::Operand => {
                return label;
            },
            ExprNodeKind::UnaryOperator => {
                let children: Vec<NodeIndex> = ast.children(cur_index);
                let operand: String = self.walk(ast, children[0]);
                return self.emit(&label, operand, None);
            },
            ExprNodeKind::BinaryOperator => {
                let children: Vec<NodeIndex> = ast.children(cur_index);
                let left: String = self.walk(ast, children[0]);
                let right: String = self.walk(ast, children[1]);

                // Assignment stores the value result first and the target
                // name second
                if label == ":=" {
                    return self.emit(&label, right, Some(left));
                }
                return self.emit(&label, left, Some(right));
            }
        }
    }

    fn emit(&mut self, operator: &str, operand1: String, operand2: Option<String>) -> String {
        let index: usize = self.triples.len();
        let new_triple: Triple = Triple {
            operator: String::from(operator),
            operand1,
            operand2
        };
        debug!("({}) {:?}", index, new_triple);

        self.triples.push(new_triple);
        return format!("({})", index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quartz::ast_builder::AstBuilder;
    use crate::quartz::lexer::Lexer;
    use crate::quartz::symbol_table::SymbolTable;
    use crate::quartz::token::Token;

    fn build_ast(source: &str) -> Ast {
        let mut symbols: SymbolTable = SymbolTable::new();
        let tokens: Vec<Token> = Lexer::new().tokenize(source, &mut symbols).unwrap();
        let (ast, _) = AstBuilder::new().build(&tokens).unwrap();
        return ast;
    }

    fn triple(operator: &str, operand1: &str, operand2: Option<&str>) -> Triple {
        return Triple {
            operator: String::from(operator),
            operand1: String::from(operand1),
            operand2: operand2.map(String::from)
        };
    }

    #[test]
    fn triples_follow_post_order() {
        let ast: Ast = build_ast("x := 1 + a + (b * c) + 3");
        let triples: Vec<Triple> = CodeGenerator::new().generate(&ast);

        assert_eq!(triples, vec![
            triple("+", "1", Some("a")),
            triple("*", "b", Some("c")),
            triple("+", "(0)", Some("(1)")),
            triple("+", "(2)", Some("3")),
            triple(":=", "(3)", Some("x"))
        ]);
    }

    #[test]
    fn back_references_only_point_backwards() {
        let ast: Ast = build_ast("x := (a + b) * (c - d) / 2");
        let triples: Vec<Triple> = CodeGenerator::new().generate(&ast);

        for (i, t) in triples.iter().enumerate() {
            let operands = [Some(&t.operand1), t.operand2.as_ref()];
            for operand in operands.into_iter().flatten() {
                if operand.starts_with('(') && operand.ends_with(')') {
                    if let Ok(target) = operand[1..operand.len() - 1].parse::<usize>() {
                        assert!(target < i, "triple {} references {}", i, operand);
                    }
                }
            }
        }
    }

    #[test]
    fn unary_triples_have_one_operand() {
        let ast: Ast = build_ast("ok := not done");
        let triples: Vec<Triple> = CodeGenerator::new().generate(&ast);

        assert_eq!(triples, vec![
            triple("not", "done", None),
            triple(":=", "(0)", Some("ok"))
        ]);
    }

    #[test]
    fn postfix_lists_operands_before_operators() {
        let ast: Ast = build_ast("1 + 2 * 3");
        assert_eq!(CodeGenerator::postfix(&ast), vec!["1", "2", "3", "*", "+"]);
    }
}
