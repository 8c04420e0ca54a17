use std::fs;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;

use quartz_compiler::quartz::{compiler, reporter};
use quartz_compiler::quartz::symbol_table::{SymbolTable, Type};
use quartz_compiler::util::quartz_log;

// Compiles a single assignment statement and writes a Markdown report of
// every analysis phase
#[derive (Parser, Debug)]
#[command (version, about = "Single-statement expression compiler front end")]
struct Args {
    // The statement to compile, or a path when --file is set
    input: String,

    /// Treat the input as a path to a source file
    #[arg (short, long)]
    file: bool,

    /// Pre-declare an identifier as NAME:TYPE (integer, real, boolean, char, string)
    #[arg (short, long = "declare", value_name = "NAME:TYPE")]
    declare: Vec<String>,

    /// Write the report to this path instead of stdout
    #[arg (short, long)]
    output: Option<PathBuf>,

    /// Log debug detail for every phase
    #[arg (short, long)]
    verbose: bool
}

fn main() {
    let args: Args = Args::parse();
    quartz_log::set_verbose(args.verbose);

    let source: String = if args.file {
        match fs::read_to_string(&args.input) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to read '{}': {}", args.input, e);
                process::exit(1);
            }
        }
    } else {
        args.input.clone()
    };
    let source: &str = source.trim();

    let mut symbols: SymbolTable = SymbolTable::new();
    for declaration in &args.declare {
        match parse_declaration(declaration) {
            Some((name, symbol_type)) => {
                symbols.declare(&name, symbol_type, 0);
            },
            None => {
                eprintln!("Invalid declaration '{}', expected NAME:TYPE", declaration);
                process::exit(1);
            }
        }
    }

    match compiler::compile(source, &mut symbols) {
        Ok(compilation) => {
            for error in &compilation.semantic_errors {
                eprintln!("{}", error);
            }

            let report: String = reporter::render(&compilation, &symbols);
            match &args.output {
                Some(path) => {
                    if let Err(e) = fs::write(path, report) {
                        eprintln!("Failed to write '{}': {}", path.display(), e);
                        process::exit(1);
                    }
                    println!("Report written to {}", path.display());
                },
                None => {
                    println!("{}", report);
                }
            }

            if !compilation.semantic_errors.is_empty() || compilation.derivation.is_err() {
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

// Splits a NAME:TYPE declaration argument
fn parse_declaration(declaration: &str) -> Option<(String, Type)> {
    let (name, type_text) = declaration.split_once(':')?;
    let name: &str = name.trim();
    if name.is_empty() {
        return None;
    }

    let symbol_type: Type = Type::from_str(type_text.trim()).ok()?;
    if symbol_type == Type::Error {
        return None;
    }
    return Some((String::from(name), symbol_type));
}
