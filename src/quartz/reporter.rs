use petgraph::graph::NodeIndex;

use string_builder::Builder;

use crate::quartz::ast::Ast;
use crate::quartz::ast_node::ExprNodeKind;
use crate::quartz::compiler::Compilation;
use crate::quartz::symbol_table::{SymbolTable, Type};
use crate::quartz::token::{self, Token};

// Renders the full Markdown report over the finished compilation products.
// Everything here is read-only; the report can be regenerated any number of
// times without disturbing the products.
pub fn render(compilation: &Compilation, symbols: &SymbolTable) -> String {
    let mut md: Builder = Builder::default();

    md.append(format!("# Compilation Report\n\n```\n{}\n```\n", compilation.source));

    append_lexical_section(&mut md, compilation);
    append_syntax_section(&mut md, compilation);
    append_semantic_section(&mut md, compilation, symbols);
    append_intermediate_section(&mut md, compilation);

    return md.string().unwrap_or_default();
}

// The graphviz dot rendition of the tree, for tooling that prefers it over
// the Markdown report
pub fn ast_dot(compilation: &Compilation) -> String {
    return compilation.ast.to_dot();
}

fn append_lexical_section(md: &mut Builder, compilation: &Compilation) {
    md.append("\n## Lexical Analysis\n\n");

    md.append(format!("**Lexemes:** `{}`\n\n", compilation.lexemes.join("` `")));

    md.append("| # | Kind | Lexeme | Id |\n");
    md.append("| --- | --- | --- | --- |\n");
    for (i, tok) in compilation.tokens.iter().enumerate() {
        md.append(format!("| {} | {} | `{}` | {} |\n", i, tok.kind, tok.text, id_cell(tok)));
    }

    md.append("\n### Fixed Tables\n\n");
    append_fixed_table(md, "Reserved words", &token::RESERVED_WORDS);
    append_fixed_table(md, "Operators", &token::OPERATORS);
    append_fixed_table(md, "Delimiters", &token::DELIMITERS);
}

fn id_cell(tok: &Token) -> String {
    return match tok.id {
        Some(id) => id.to_string(),
        None => String::from("-")
    };
}

fn append_fixed_table(md: &mut Builder, title: &str, entries: &[(&str, u32)]) {
    md.append(format!("**{}**\n\n", title));
    md.append("| Lexeme | Id |\n");
    md.append("| --- | --- |\n");
    for (lexeme, id) in entries {
        md.append(format!("| `{}` | {} |\n", lexeme, id));
    }
    md.append("\n");
}

fn append_syntax_section(md: &mut Builder, compilation: &Compilation) {
    md.append("\n## Syntax Analysis\n\n");

    md.append(format!("**Postfix notation:** `{}`\n\n", compilation.postfix.join(" ")));

    md.append("### Abstract Syntax Tree\n\n");
    md.append(mermaid_ast(&compilation.ast, false));

    md.append("\n### Grammar Derivation\n\n");
    match &compilation.derivation {
        Ok(tree) => {
            md.append(format!("```\n{}```\n", tree.to_text()));
        },
        Err(diagnostic) => {
            md.append(format!("**Syntax error:** {}\n\nThe token stream does not derive from the statement grammar.\n", diagnostic));
        }
    }
}

fn append_semantic_section(md: &mut Builder, compilation: &Compilation, symbols: &SymbolTable) {
    md.append("\n## Semantic Analysis\n\n");

    if compilation.semantic_errors.is_empty() {
        md.append("No semantic errors.\n\n");
    } else {
        for error in &compilation.semantic_errors {
            md.append(format!("- {}\n", error));
        }
        md.append("\n");
    }

    md.append("### Annotated Syntax Tree\n\n");
    md.append(mermaid_ast(&compilation.ast, true));

    md.append("\n### Symbol Table\n\n");
    md.append("| Id | Name | Type | Scope | Address | Mode |\n");
    md.append("| --- | --- | --- | --- | --- | --- |\n");
    for sym in symbols.entries() {
        md.append(format!(
            "| {} | `{}` | {} | {} | {:#06X} | {} |\n",
            sym.id, sym.name, sym.symbol_type, sym.scope, sym.address, sym.mode
        ));
    }
    md.append(format!(
        "\n{} symbol(s); next free address {:#06X}.\n",
        symbols.entries().len(),
        symbols.next_address()
    ));
}

fn append_intermediate_section(md: &mut Builder, compilation: &Compilation) {
    md.append("\n## Intermediate Code\n\n");

    md.append("| # | Operator | Operand 1 | Operand 2 |\n");
    md.append("| --- | --- | --- | --- |\n");
    for (i, triple) in compilation.triples.iter().enumerate() {
        let operand2: &str = triple.operand2.as_deref().unwrap_or("-");
        md.append(format!("| ({}) | `{}` | `{}` | `{}` |\n", i, triple.operator, triple.operand1, operand2));
    }
}

// Mermaid has no raw double quote inside a label
fn mermaid_escape(label: &str) -> String {
    return label.replace('"', "#quot;");
}

// Renders the tree as a Mermaid flowchart. Operators come out as circles
// and operands as rounded boxes; the annotated variant adds the inferred
// type and addressing mode under each label and styles sentinel nodes.
fn mermaid_ast(ast: &Ast, annotated: bool) -> String {
    let mut chart: Builder = Builder::default();
    chart.append("```mermaid\ngraph TD\n");

    if annotated {
        chart.append("    classDef err fill:#fbb,stroke:#900\n");
    }

    if let Some(root) = ast.root {
        mermaid_dfs(ast, NodeIndex::new(root), annotated, &mut chart);
    }

    chart.append("```\n");
    return chart.string().unwrap_or_default();
}

fn mermaid_dfs(ast: &Ast, cur_index: NodeIndex, annotated: bool, chart: &mut Builder) {
    chart.append(format!("    {}\n", mermaid_node(ast, cur_index, annotated)));

    for child_index in ast.children(cur_index) {
        chart.append(format!("    N{} --> N{}\n", cur_index.index(), child_index.index()));
        mermaid_dfs(ast, child_index, annotated, chart);
    }
}

fn mermaid_node(ast: &Ast, index: NodeIndex, annotated: bool) -> String {
    let node = &ast.graph[index];
    let mut label: String = mermaid_escape(&node.label);

    let mut is_error: bool = false;
    if annotated {
        if let Some(inferred) = node.inferred_type {
            is_error = inferred == Type::Error;
            label = format!("<b>{}</b><br/><i>{}</i>", label, inferred);
        }
        if let Some(mode) = node.mode {
            label = format!("{}<br/>{}", label, mode);
        }
        if let Some(address) = node.address {
            label = format!("{}<br/>{:#06X}", label, address);
        }
    }

    let shaped: String = match node.kind {
        ExprNodeKind::Operand => format!("N{}([\"{}\"])", index.index(), label),
        _ => format!("N{}((\"{}\"))", index.index(), label)
    };

    if is_error {
        return format!("{}:::err", shaped);
    }
    return shaped;
}
