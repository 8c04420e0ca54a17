pub mod quartz;
pub mod util;

pub use crate::quartz::compiler::{compile, Compilation};
pub use crate::quartz::error::{CompileError, SemanticError};
pub use crate::quartz::symbol_table::{SymbolTable, Type};
