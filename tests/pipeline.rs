use petgraph::graph::NodeIndex;

use quartz_compiler::quartz::code_generator::Triple;
use quartz_compiler::quartz::compiler::{self, Compilation};
use quartz_compiler::quartz::error::{CompileError, SemanticError};
use quartz_compiler::quartz::lexer::Lexer;
use quartz_compiler::quartz::symbol_table::{SymbolTable, Type};
use quartz_compiler::quartz::token::Token;

fn triple(operator: &str, operand1: &str, operand2: Option<&str>) -> Triple {
    return Triple {
        operator: String::from(operator),
        operand1: String::from(operand1),
        operand2: operand2.map(String::from)
    };
}

#[test]
fn full_pipeline_over_a_clean_statement() {
    let mut symbols: SymbolTable = SymbolTable::new();
    symbols.declare("area", Type::Real, 0);
    symbols.declare("radius", Type::Real, 0);

    let compilation: Compilation = compiler::compile("area := 3.14 * radius * radius", &mut symbols).unwrap();

    assert_eq!(compilation.tokens.len(), 7);
    assert_eq!(compilation.postfix, vec!["area", "3.14", "radius", "*", "radius", "*", ":="]);
    assert_eq!(compilation.triples, vec![
        triple("*", "3.14", Some("radius")),
        triple("*", "(0)", Some("radius")),
        triple(":=", "(1)", Some("area"))
    ]);
    assert!(compilation.semantic_errors.is_empty());
    assert!(compilation.derivation.is_ok());

    let root = NodeIndex::new(compilation.ast.root.unwrap());
    assert_eq!(compilation.ast.graph[root].inferred_type, Some(Type::Real));
}

#[test]
fn bare_expressions_build_a_tree_but_fail_the_grammar() {
    // The tree builder takes any well-formed expression; only the grammar
    // checker insists on the assignment statement shape
    let mut symbols: SymbolTable = SymbolTable::new();
    let compilation: Compilation = compiler::compile("1 + 2", &mut symbols).unwrap();

    assert_eq!(compilation.postfix, vec!["1", "2", "+"]);
    assert!(compilation.derivation.is_err());
    assert_eq!(compilation.triples, vec![triple("+", "1", Some("2"))]);
}

#[test]
fn lexical_errors_abort_the_whole_unit() {
    let mut symbols: SymbolTable = SymbolTable::new();
    let result = compiler::compile("x := 1 $ 2", &mut symbols);
    assert!(matches!(result, Err(CompileError::Lexical { character: '$' })));
}

#[test]
fn semantic_errors_do_not_abort_the_pipeline() {
    let mut symbols: SymbolTable = SymbolTable::new();
    symbols.declare("total", Type::Integer, 0);

    let compilation: Compilation = compiler::compile("total := count + 2.5", &mut symbols).unwrap();

    assert_eq!(compilation.semantic_errors, vec![
        SemanticError::InvalidAssignment { from: Type::Real, to: Type::Integer }
    ]);
    // The intermediate code still comes out
    assert_eq!(compilation.triples, vec![
        triple("+", "count", Some("2.5")),
        triple(":=", "(0)", Some("total"))
    ]);
    assert!(compilation.derivation.is_ok());
}

#[test]
fn tree_shape_and_derivation_agree_on_grouping() {
    let mut symbols: SymbolTable = SymbolTable::new();
    let compilation: Compilation = compiler::compile("x := a + b * c", &mut symbols).unwrap();

    assert!(compilation.derivation.is_ok());
    assert_eq!(compilation.postfix, vec!["x", "a", "b", "c", "*", "+", ":="]);

    // The multiplication sits under the addition on the right
    let root = NodeIndex::new(compilation.ast.root.unwrap());
    let root_children = compilation.ast.children(root);
    assert_eq!(compilation.ast.graph[root_children[1]].label, "+");
    let plus_children = compilation.ast.children(root_children[1]);
    assert_eq!(compilation.ast.graph[plus_children[1]].label, "*");
}

#[test]
fn rebuilding_the_tree_from_postfix_preserves_the_order() {
    // For expressions without unary operators, flattening the assembled
    // tree reproduces the postfix order it was assembled from
    let mut symbols: SymbolTable = SymbolTable::new();
    for source in ["x := a + b * c", "y := (a + b) * (c - d) / 2", "z := 1 - 2 - 3"] {
        let compilation: Compilation = compiler::compile(source, &mut symbols).unwrap();
        let from_tree: Vec<String> = compilation.postfix.clone();

        let tokens: Vec<Token> = compilation.tokens.clone();
        let builder = quartz_compiler::quartz::ast_builder::AstBuilder::new();
        let shunted: Vec<String> = builder
            .infix_to_postfix(&tokens)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();

        assert_eq!(from_tree, shunted, "round trip failed for '{}'", source);
    }
}

#[test]
fn the_symbol_table_accrues_across_statements() {
    let mut symbols: SymbolTable = SymbolTable::new();

    compiler::compile("x := 1", &mut symbols).unwrap();
    let first_address: u32 = symbols.lookup("x").unwrap().address;

    compiler::compile("y := x + 1", &mut symbols).unwrap();

    assert_eq!(symbols.lookup("x").unwrap().address, first_address);
    assert_eq!(symbols.entries().len(), 2);
}

#[test]
fn segmented_lexemes_classify_like_the_raw_text() {
    let mut symbols: SymbolTable = SymbolTable::new();
    let compilation: Compilation = compiler::compile("x := (a + b) / 2", &mut symbols).unwrap();

    let mut fresh: SymbolTable = SymbolTable::new();
    let reclassified: Vec<Token> = Lexer::new().tokenize_lexemes(&compilation.lexemes, &mut fresh).unwrap();

    assert_eq!(reclassified, compilation.tokens);
}

#[test]
fn string_concatenation_flows_through_every_phase() {
    let mut symbols: SymbolTable = SymbolTable::new();
    symbols.declare("s", Type::String, 0);

    let compilation: Compilation = compiler::compile("s := \"to\" + \"gether\"", &mut symbols).unwrap();

    assert!(compilation.semantic_errors.is_empty());
    let root = NodeIndex::new(compilation.ast.root.unwrap());
    assert_eq!(compilation.ast.graph[root].inferred_type, Some(Type::String));
    assert_eq!(compilation.triples, vec![
        triple("+", "\"to\"", Some("\"gether\"")),
        triple(":=", "(0)", Some("s"))
    ]);
}

#[test]
fn relational_and_logical_operators_compose() {
    let mut symbols: SymbolTable = SymbolTable::new();
    symbols.declare("ok", Type::Boolean, 0);

    let compilation: Compilation = compiler::compile("ok := a < b and c >= d", &mut symbols).unwrap();

    assert!(compilation.semantic_errors.is_empty());
    assert!(compilation.derivation.is_ok());
    assert_eq!(compilation.postfix, vec!["ok", "a", "b", "<", "c", "d", ">=", "and", ":="]);

    let root = NodeIndex::new(compilation.ast.root.unwrap());
    assert_eq!(compilation.ast.graph[root].inferred_type, Some(Type::Boolean));
}
