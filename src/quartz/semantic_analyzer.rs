use log::debug;

use petgraph::graph::NodeIndex;

use crate::quartz::ast::Ast;
use crate::quartz::ast_node::ExprNodeKind;
use crate::quartz::error::SemanticError;
use crate::quartz::symbol_table::{AddressingMode, SymbolTable, Type};
use crate::quartz::type_system::TypeSystem;
use crate::util::quartz_log;

// All digits makes an integer literal
fn is_integer_literal(text: &str) -> bool {
    return !text.is_empty() && text.chars().all(|c| c.is_ascii_digit());
}

// Exactly one decimal point, an optional leading sign, digits everywhere else
fn is_real_literal(text: &str) -> bool {
    let body: &str = text.strip_prefix('-').unwrap_or(text);

    if body.matches('.').count() != 1 {
        return false;
    }
    if !body.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        return false;
    }
    return body.chars().all(|c| c.is_ascii_digit() || c == '.');
}

// Annotates every node of the tree with its inferred type and addressing
// mode by a post-order traversal. Errors are accumulated, never thrown, so
// the tree comes out fully annotated even when the expression is wrong.
pub struct SemanticAnalyzer {
    errors: Vec<SemanticError>
}

impl SemanticAnalyzer {
    // Constructor for the analyzer
    pub fn new() -> Self {
        return SemanticAnalyzer {
            errors: Vec::new()
        };
    }

    // Annotates the tree in place and returns the accumulated errors.
    // Running this twice over the same tree produces the same annotations.
    pub fn analyze(&mut self, ast: &mut Ast, symbols: &SymbolTable) -> Vec<SemanticError> {
        self.errors.clear();

        if let Some(root) = ast.root {
            self.annotate(ast, NodeIndex::new(root), symbols);
        }

        if self.errors.is_empty() {
            quartz_log::log(
                quartz_log::LogTypes::Info,
                quartz_log::LogSources::SemanticAnalyzer,
                String::from("Semantic analysis completed with 0 errors")
            );
        } else {
            quartz_log::log(
                quartz_log::LogTypes::Error,
                quartz_log::LogSources::SemanticAnalyzer,
                format!("Semantic analysis failed with {} error(s)", self.errors.len())
            );
        }

        return self.errors.clone();
    }

    // Records an error, keeping each distinct error once
    fn record(&mut self, error: SemanticError) {
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    // Post-order worker. Returns the type inferred for the node so the
    // parent can check its own rule.
    fn annotate(&mut self, ast: &mut Ast, cur_index: NodeIndex, symbols: &SymbolTable) -> Type {
        let label: String = ast.graph[cur_index].label.to_owned();
        let kind: ExprNodeKind = ast.graph[cur_index].kind;

        match kind {
            ExprNodeKind::Operand => {
                let (inferred, mode, address) = self.classify_operand(&label, symbols);
                debug!("Leaf '{}' classified as {}", label, inferred);

                let node = &mut ast.graph[cur_index];
                node.inferred_type = Some(inferred);
                node.mode = mode;
                node.address = address;
                return inferred;
            },
            ExprNodeKind::UnaryOperator => {
                let children: Vec<NodeIndex> = ast.children(cur_index);
                let operand_type: Type = self.annotate(ast, children[0], symbols);

                let inferred: Type = if operand_type == Type::Error {
                    // The child already failed, do not pile on
                    Type::Error
                } else if operand_type == Type::Boolean {
                    Type::Boolean
                } else {
                    self.record(SemanticError::InvalidNegation { operand: operand_type });
                    Type::Error
                };

                let node = &mut ast.graph[cur_index];
                node.inferred_type = Some(inferred);
                node.mode = Some(AddressingMode::Register);
                return inferred;
            },
            ExprNodeKind::BinaryOperator => {
                let children: Vec<NodeIndex> = ast.children(cur_index);
                let left_type: Type = self.annotate(ast, children[0], symbols);
                let right_type: Type = self.annotate(ast, children[1], symbols);

                let (inferred, mode) = if label == ":=" {
                    self.check_assignment(left_type, right_type)
                } else {
                    self.check_operation(&label, left_type, right_type)
                };

                let node = &mut ast.graph[cur_index];
                node.inferred_type = Some(inferred);
                node.mode = Some(mode);
                return inferred;
            }
        }
    }

    // Leaf classification, most specific first: integer, real, boolean
    // literal, char, string, and finally a symbol table lookup
    fn classify_operand(&mut self, label: &str, symbols: &SymbolTable) -> (Type, Option<AddressingMode>, Option<u32>) {
        if is_integer_literal(label) {
            return (Type::Integer, Some(AddressingMode::Immediate), None);
        }
        if is_real_literal(label) {
            return (Type::Real, Some(AddressingMode::Immediate), None);
        }
        if label == "true" || label == "false" {
            return (Type::Boolean, Some(AddressingMode::Immediate), None);
        }
        if label.len() >= 2 && label.starts_with('\'') && label.ends_with('\'') {
            return (Type::Char, Some(AddressingMode::Immediate), None);
        }
        if label.len() >= 2 && label.starts_with('"') && label.ends_with('"') {
            return (Type::String, Some(AddressingMode::Immediate), None);
        }

        match symbols.lookup(label) {
            Some(symbol) => {
                return (symbol.symbol_type, Some(symbol.mode), Some(symbol.address));
            },
            None => {
                self.record(SemanticError::UndeclaredVariable { name: String::from(label) });
                return (Type::Error, None, None);
            }
        }
    }

    // Assignment keeps the left-hand type and checks that the right-hand
    // side converts into it. A sentinel on either side skips the check.
    fn check_assignment(&mut self, left_type: Type, right_type: Type) -> (Type, AddressingMode) {
        if left_type == Type::Error || right_type == Type::Error {
            return (Type::Error, AddressingMode::Direct);
        }

        if !TypeSystem::can_convert(right_type, left_type) {
            self.record(SemanticError::InvalidAssignment { from: right_type, to: left_type });
            return (Type::Error, AddressingMode::Direct);
        }

        return (left_type, AddressingMode::Direct);
    }

    // Every other binary operator goes through the compatibility table
    fn check_operation(&mut self, operator: &str, left_type: Type, right_type: Type) -> (Type, AddressingMode) {
        if left_type == Type::Error || right_type == Type::Error {
            // Already reported further down the tree
            return (Type::Error, AddressingMode::Register);
        }

        match TypeSystem::result_type(operator, left_type, Some(right_type)) {
            Some(result) => {
                return (result, AddressingMode::Register);
            },
            None => {
                self.record(SemanticError::TypeMismatch {
                    operator: String::from(operator),
                    left: left_type,
                    right: right_type
                });
                return (Type::Error, AddressingMode::Register);
            }
        }
    }
}
