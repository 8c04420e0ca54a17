use crate::quartz::ast::Ast;
use crate::quartz::ast_builder::AstBuilder;
use crate::quartz::code_generator::{CodeGenerator, Triple};
use crate::quartz::error::{CompileError, SemanticError};
use crate::quartz::grammar_checker::{DerivationTree, GrammarChecker};
use crate::quartz::lexer::{self, Lexer};
use crate::quartz::semantic_analyzer::SemanticAnalyzer;
use crate::quartz::symbol_table::SymbolTable;
use crate::quartz::token::Token;
use crate::util::quartz_log;

// Everything one compile invocation produces. The reporting layer reads
// these products; nothing in the core touches them again.
#[derive (Debug)]
pub struct Compilation {
    pub source: String,
    // Character-level segmentation of the source, for the report
    pub lexemes: Vec<String>,
    pub tokens: Vec<Token>,
    // The annotated syntax tree
    pub ast: Ast,
    // The independent grammar derivation, or its diagnostic
    pub derivation: Result<DerivationTree, CompileError>,
    pub semantic_errors: Vec<SemanticError>,
    pub postfix: Vec<String>,
    pub triples: Vec<Triple>
}

// Runs the full pipeline over one statement. The symbol table is owned by
// the caller and accumulates declarations across invocations. Lexical and
// tree-construction failures abort the unit; the grammar checker and the
// semantic analyzer only ever record diagnostics.
pub fn compile(source: &str, symbols: &mut SymbolTable) -> Result<Compilation, CompileError> {
    quartz_log::log(
        quartz_log::LogTypes::Info,
        quartz_log::LogSources::Quartz,
        format!("Compiling `{}`", source)
    );

    let lexemes: Vec<String> = lexer::segment(source);
    let tokens: Vec<Token> = Lexer::new().tokenize(source, symbols)?;

    let (mut ast, _) = AstBuilder::new().build(&tokens)?;

    // Side channel: the grammar checker validates the same token stream but
    // cannot abort the pipeline
    let derivation: Result<DerivationTree, CompileError> = GrammarChecker::new(&tokens).analyze();
    if let Err(diagnostic) = &derivation {
        quartz_log::log(
            quartz_log::LogTypes::Warning,
            quartz_log::LogSources::GrammarChecker,
            format!("{}", diagnostic)
        );
    }

    let semantic_errors: Vec<SemanticError> = SemanticAnalyzer::new().analyze(&mut ast, symbols);

    let triples: Vec<Triple> = CodeGenerator::new().generate(&ast);
    let postfix: Vec<String> = CodeGenerator::postfix(&ast);

    return Ok(Compilation {
        source: String::from(source),
        lexemes,
        tokens,
        ast,
        derivation,
        semantic_errors,
        postfix,
        triples
    });
}
