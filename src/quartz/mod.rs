pub mod ast;
pub mod ast_builder;
pub mod ast_node;
pub mod code_generator;
pub mod compiler;
pub mod error;
pub mod grammar_checker;
pub mod lexer;
pub mod reporter;
pub mod semantic_analyzer;
pub mod symbol_table;
pub mod token;
pub mod type_system;
