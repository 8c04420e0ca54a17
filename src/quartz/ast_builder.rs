use log::debug;

use petgraph::graph::NodeIndex;

use crate::quartz::ast::Ast;
use crate::quartz::error::CompileError;
use crate::quartz::token::{Token, TokenKind};
use crate::util::quartz_log;

// Precedence level of an operator, or None for anything that is not an
// operator. Low binds loosest.
fn precedence(operator: &str) -> Option<u8> {
    return match operator {
        ":=" => Some(0),
        "and" | "or" => Some(1),
        "not" => Some(2),
        "=" | "<" | ">" | "<=" | ">=" | "<>" => Some(3),
        "+" | "-" => Some(4),
        "*" | "/" => Some(5),
        _ => None
    };
}

// Assignment and unary negation group to the right, every other operator
// groups to the left
fn is_right_associative(operator: &str) -> bool {
    return operator == ":=" || operator == "not";
}

// Converts the infix token stream to postfix order and assembles the
// abstract syntax tree from it
pub struct AstBuilder;

impl AstBuilder {
    pub fn new() -> Self {
        return AstBuilder;
    }

    // Runs both steps and returns the tree along with the postfix token
    // order it was assembled from
    pub fn build(&self, tokens: &[Token]) -> Result<(Ast, Vec<Token>), CompileError> {
        if tokens.is_empty() {
            return Err(CompileError::Syntax {
                expected: String::from("an assignment statement"),
                found: String::from("an empty token stream")
            });
        }

        let postfix: Vec<Token> = self.infix_to_postfix(tokens)?;
        debug!("Postfix order: {:?}", postfix.iter().map(|t| t.text.as_str()).collect::<Vec<&str>>());

        let ast: Ast = self.build_tree(&postfix)?;
        quartz_log::log(
            quartz_log::LogTypes::Info,
            quartz_log::LogSources::Parser,
            format!("Built the syntax tree from {} postfix tokens", postfix.len())
        );

        return Ok((ast, postfix));
    }

    // The shunting-yard pass. Operands go straight to the output; operators
    // pop anything on the stack that binds at least as tight (strictly
    // tighter for the right-associative ones) before being pushed.
    pub fn infix_to_postfix(&self, tokens: &[Token]) -> Result<Vec<Token>, CompileError> {
        let mut output: Vec<Token> = Vec::new();
        let mut stack: Vec<Token> = Vec::new();

        for token in tokens {
            match token.kind {
                TokenKind::Identifier | TokenKind::Constant | TokenKind::StringLit => {
                    output.push(token.to_owned());
                },
                TokenKind::Operator => {
                    let incoming: u8 = precedence(&token.text)
                        .expect("every operator token has a precedence level");

                    // Unary negation goes on the stack without popping
                    if token.text == "not" {
                        stack.push(token.to_owned());
                        continue;
                    }

                    while let Some(top) = stack.last() {
                        let top_precedence: Option<u8> = precedence(&top.text);
                        let pops: bool = match top_precedence {
                            Some(top_level) => {
                                if is_right_associative(&token.text) {
                                    top_level > incoming
                                } else {
                                    top_level >= incoming
                                }
                            },
                            // A '(' on the stack stops the popping
                            None => false
                        };

                        if pops {
                            output.push(stack.pop().unwrap());
                        } else {
                            break;
                        }
                    }
                    stack.push(token.to_owned());
                },
                TokenKind::Paren => {
                    if token.text == "(" {
                        stack.push(token.to_owned());
                    } else {
                        // Pop to the output until the matching '(' shows up
                        loop {
                            match stack.pop() {
                                Some(top) if top.text == "(" => break,
                                Some(top) => output.push(top),
                                None => return Err(CompileError::UnbalancedParenthesis)
                            }
                        }
                    }
                },
                // Delimiters and reserved words have no place in the
                // expression itself
                TokenKind::Delimiter | TokenKind::ReservedWord => {}
            }
        }

        // End of input flushes the stack; a leftover '(' was never closed
        while let Some(top) = stack.pop() {
            if top.text == "(" {
                return Err(CompileError::UnbalancedParenthesis);
            }
            output.push(top);
        }

        return Ok(output);
    }

    // Assembles the tree from the postfix sequence with a stack of node
    // indices. Unary operators take one operand, binary operators take two
    // with the right child popped first.
    pub fn build_tree(&self, postfix: &[Token]) -> Result<Ast, CompileError> {
        let mut ast: Ast = Ast::new();
        let mut stack: Vec<NodeIndex> = Vec::new();

        for token in postfix {
            if token.kind == TokenKind::Operator {
                if token.text == "not" {
                    let child: NodeIndex = stack.pop().ok_or(CompileError::OperatorArity {
                        operator: token.text.to_owned()
                    })?;
                    stack.push(ast.add_unary(&token.text, child));
                } else {
                    let right: NodeIndex = stack.pop().ok_or(CompileError::OperatorArity {
                        operator: token.text.to_owned()
                    })?;
                    let left: NodeIndex = stack.pop().ok_or(CompileError::OperatorArity {
                        operator: token.text.to_owned()
                    })?;
                    stack.push(ast.add_binary(&token.text, left, right));
                }
            } else {
                stack.push(ast.add_operand(&token.text));
            }
        }

        if stack.len() != 1 {
            return Err(CompileError::TrailingOperands { count: stack.len() });
        }

        ast.set_root(stack.pop().unwrap());
        return Ok(ast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quartz::ast_node::ExprNodeKind;
    use crate::quartz::lexer::Lexer;
    use crate::quartz::symbol_table::SymbolTable;

    fn tokens_of(source: &str) -> Vec<Token> {
        let mut symbols: SymbolTable = SymbolTable::new();
        return Lexer::new().tokenize(source, &mut symbols).unwrap();
    }

    fn postfix_text(source: &str) -> Vec<String> {
        let builder: AstBuilder = AstBuilder::new();
        let postfix: Vec<Token> = builder.infix_to_postfix(&tokens_of(source)).unwrap();
        return postfix.into_iter().map(|t| t.text).collect();
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(postfix_text("1 + 2 * 3"), vec!["1", "2", "3", "*", "+"]);
    }

    #[test]
    fn left_associative_operators_pop_equal_precedence() {
        assert_eq!(postfix_text("1 - 2 + 3"), vec!["1", "2", "-", "3", "+"]);
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(postfix_text("(1 + 2) * 3"), vec!["1", "2", "+", "3", "*"]);
    }

    #[test]
    fn addition_root_with_multiplication_right_child() {
        let builder: AstBuilder = AstBuilder::new();
        let (ast, _) = builder.build(&tokens_of("1 + 2 * 3")).unwrap();

        let root = petgraph::graph::NodeIndex::new(ast.root.unwrap());
        assert_eq!(ast.graph[root].label, "+");
        assert_eq!(ast.graph[root].kind, ExprNodeKind::BinaryOperator);

        let children = ast.children(root);
        assert_eq!(ast.graph[children[0]].label, "1");
        assert_eq!(ast.graph[children[1]].label, "*");
    }

    #[test]
    fn unary_not_takes_one_operand() {
        let builder: AstBuilder = AstBuilder::new();
        let (ast, _) = builder.build(&tokens_of("not (a and b)")).unwrap();

        let root = petgraph::graph::NodeIndex::new(ast.root.unwrap());
        assert_eq!(ast.graph[root].label, "not");
        assert_eq!(ast.graph[root].kind, ExprNodeKind::UnaryOperator);
        assert_eq!(ast.children(root).len(), 1);
    }

    #[test]
    fn unclosed_parenthesis_is_an_error() {
        let builder: AstBuilder = AstBuilder::new();
        let result = builder.build(&tokens_of("x := (1 + 2"));
        assert_eq!(result.err(), Some(CompileError::UnbalancedParenthesis));
    }

    #[test]
    fn unopened_parenthesis_is_an_error() {
        let builder: AstBuilder = AstBuilder::new();
        let result = builder.build(&tokens_of("x := 1 + 2)"));
        assert_eq!(result.err(), Some(CompileError::UnbalancedParenthesis));
    }

    #[test]
    fn missing_operand_is_an_arity_error() {
        let builder: AstBuilder = AstBuilder::new();
        let result = builder.build(&tokens_of("x := +"));
        assert_eq!(result.err(), Some(CompileError::OperatorArity { operator: String::from("+") }));
    }

    #[test]
    fn leftover_operands_are_an_error() {
        let builder: AstBuilder = AstBuilder::new();
        let result = builder.build(&tokens_of("x := 1 2"));
        assert_eq!(result.err(), Some(CompileError::TrailingOperands { count: 2 }));
    }

    #[test]
    fn empty_stream_is_a_syntax_error() {
        let builder: AstBuilder = AstBuilder::new();
        let result = builder.build(&[]);
        assert!(matches!(result.err(), Some(CompileError::Syntax { .. })));
    }
}
