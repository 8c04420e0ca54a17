use crate::quartz::symbol_table::Type;

// Fatal errors. Each one aborts the phase that raises it and surfaces to the
// caller, except when raised inside the grammar checker, whose entry point
// returns them as a diagnostic result instead.
#[derive (Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Lexical error: unrecognized character '{character}'")]
    Lexical { character: char },

    #[error("Syntax error: expected {expected} but found {found}")]
    Syntax { expected: String, found: String },

    #[error("Syntax error: unbalanced parenthesis in the expression")]
    UnbalancedParenthesis,

    #[error("Syntax error: operator '{operator}' is missing an operand")]
    OperatorArity { operator: String },

    #[error("Syntax error: expression left {count} operands unconsumed")]
    TrailingOperands { count: usize },

    #[error("Syntax error: extra token '{token}' after the end of the statement")]
    TrailingTokens { token: String }
}

// Non-fatal errors. The semantic analyzer accumulates these in a list and
// keeps annotating, so the tree is always complete even when it is wrong.
#[derive (Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("Variable '{name}' has not been declared")]
    UndeclaredVariable { name: String },

    #[error("Operation '{operator}' is not allowed between {left} and {right}")]
    TypeMismatch { operator: String, left: Type, right: Type },

    #[error("Cannot assign {from} to {to}")]
    InvalidAssignment { from: Type, to: Type },

    #[error("Operator 'not' cannot be applied to {operand}")]
    InvalidNegation { operand: Type }
}
