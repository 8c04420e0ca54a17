use std::fmt;

use crate::quartz::symbol_table::{AddressingMode, Type};

// The arity class of a node relative to the expression
#[derive (Debug, Clone, Copy, PartialEq)]
pub enum ExprNodeKind {
    // An identifier or literal leaf
    Operand,
    // 'not', one child
    UnaryOperator,
    // Everything else, two children
    BinaryOperator
}

// A node of the abstract syntax tree. The semantic fields start out empty
// and are filled in exactly once by the semantic analyzer before code
// generation reads the tree.
#[derive (Clone, PartialEq)]
pub struct ExprNode {
    // The lexeme or operator symbol
    pub label: String,
    pub kind: ExprNodeKind,

    // Filled in by the semantic analyzer
    pub inferred_type: Option<Type>,
    pub mode: Option<AddressingMode>,
    pub address: Option<u32>
}

impl ExprNode {
    pub fn operand(label: &str) -> Self {
        return ExprNode {
            label: String::from(label),
            kind: ExprNodeKind::Operand,
            inferred_type: None,
            mode: None,
            address: None
        };
    }

    pub fn unary(label: &str) -> Self {
        return ExprNode {
            label: String::from(label),
            kind: ExprNodeKind::UnaryOperator,
            inferred_type: None,
            mode: None,
            address: None
        };
    }

    pub fn binary(label: &str) -> Self {
        return ExprNode {
            label: String::from(label),
            kind: ExprNodeKind::BinaryOperator,
            inferred_type: None,
            mode: None,
            address: None
        };
    }
}

// Instead of deriving Debug, we implement it so the graph's dot output and
// the text renderings print the node the way we want
impl fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inferred_type {
            Some(inferred) => write!(f, "{} : {}", self.label, inferred),
            None => write!(f, "{}", self.label)
        }
    }
}
