use log::debug;
use regex::Regex;

use crate::quartz::error::CompileError;
use crate::quartz::symbol_table::{SymbolTable, Type};
use crate::quartz::token::{self, Token, TokenKind};
use crate::util::quartz_log;

// The classification classes, in priority order. The first class whose
// pattern matches at the current position wins, so the most specific
// alternatives have to come first: reserved words before identifiers,
// reals before integers, ':=' before ':'.
#[derive (Debug, Clone, Copy, PartialEq)]
enum LexClass {
    ReservedWord,
    WordOperator,
    BooleanLiteral,
    RealLiteral,
    IntegerLiteral,
    CharLiteral,
    StringLiteral,
    Identifier,
    MultiCharOperator,
    SingleCharOperator,
    Delimiter,
    Paren,
    Whitespace
}

pub struct Lexer {
    // One anchored pattern per class, tried in order
    specs: Vec<(LexClass, Regex)>
}

impl Lexer {
    // Constructor for the lexer, compiling the token specification list
    pub fn new() -> Self {
        let spec_sources: Vec<(LexClass, &str)> = vec![
            (LexClass::ReservedWord, r"^(var|proc|begin|end|integer|char|real)\b"),
            (LexClass::WordOperator, r"^(and|or|not)\b"),
            (LexClass::BooleanLiteral, r"^(true|false)\b"),
            (LexClass::RealLiteral, r"^\d+\.\d+"),
            (LexClass::IntegerLiteral, r"^\d+"),
            (LexClass::CharLiteral, r"^'[^']*'"),
            (LexClass::StringLiteral, r#"^"[^"]*""#),
            (LexClass::Identifier, r"^[a-zA-Z_]\w*"),
            (LexClass::MultiCharOperator, r"^(:=|<=|>=|<>)"),
            (LexClass::SingleCharOperator, r"^[+\-*/=<>]"),
            (LexClass::Delimiter, r"^[:;]"),
            (LexClass::Paren, r"^[()]"),
            (LexClass::Whitespace, r"^\s+")
        ];

        return Lexer {
            specs: spec_sources
                .into_iter()
                .map(|(class, source)| (class, Regex::new(source).unwrap()))
                .collect()
        };
    }

    // Turns source text into a token stream. Identifiers that are not in the
    // symbol table yet are auto-registered with the default type and the next
    // synthetic address. Any character no class recognizes aborts the whole
    // unit with a lexical error.
    pub fn tokenize(&self, source: &str, symbols: &mut SymbolTable) -> Result<Vec<Token>, CompileError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut pos: usize = 0;

        while pos < source.len() {
            let rest: &str = &source[pos..];

            let matched: Option<(LexClass, &str)> = self
                .specs
                .iter()
                .find_map(|(class, regex)| regex.find(rest).map(|m| (*class, m.as_str())));

            match matched {
                Some((LexClass::Whitespace, text)) => {
                    pos += text.len();
                },
                Some((class, text)) => {
                    let new_token: Token = self.classify(class, text, symbols);
                    quartz_log::log(
                        quartz_log::LogTypes::Debug,
                        quartz_log::LogSources::Lexer,
                        format!("Found {} at position {}", new_token, pos)
                    );
                    tokens.push(new_token);
                    pos += text.len();
                },
                None => {
                    let character: char = rest.chars().next().unwrap();
                    quartz_log::log(
                        quartz_log::LogTypes::Error,
                        quartz_log::LogSources::Lexer,
                        format!("Unrecognized character '{}' at position {}", character, pos)
                    );
                    return Err(CompileError::Lexical { character });
                }
            }
        }

        quartz_log::log(
            quartz_log::LogTypes::Info,
            quartz_log::LogSources::Lexer,
            format!("Lexical analysis produced {} tokens", tokens.len())
        );

        return Ok(tokens);
    }

    // Classifies a pre-segmented lexeme list. Each lexeme must be matched in
    // full by one of the classes.
    pub fn tokenize_lexemes(&self, lexemes: &[String], symbols: &mut SymbolTable) -> Result<Vec<Token>, CompileError> {
        let mut tokens: Vec<Token> = Vec::new();

        for lexeme in lexemes {
            let matched: Option<(LexClass, &str)> = self
                .specs
                .iter()
                .find_map(|(class, regex)| {
                    regex
                        .find(lexeme)
                        .filter(|m| m.as_str().len() == lexeme.len())
                        .map(|m| (*class, m.as_str()))
                });

            match matched {
                Some((LexClass::Whitespace, _)) => {},
                Some((class, text)) => tokens.push(self.classify(class, text, symbols)),
                None => {
                    let character: char = lexeme.chars().next().unwrap_or(' ');
                    return Err(CompileError::Lexical { character });
                }
            }
        }

        return Ok(tokens);
    }

    // Builds the token for a classified lexeme, consulting and mutating the
    // symbol table for identifiers
    fn classify(&self, class: LexClass, lexeme: &str, symbols: &mut SymbolTable) -> Token {
        match class {
            LexClass::ReservedWord => {
                return Token::new(TokenKind::ReservedWord, lexeme, token::reserved_word_id(lexeme));
            },
            LexClass::WordOperator | LexClass::MultiCharOperator | LexClass::SingleCharOperator => {
                return Token::new(TokenKind::Operator, lexeme, token::operator_id(lexeme));
            },
            LexClass::BooleanLiteral | LexClass::RealLiteral | LexClass::IntegerLiteral => {
                return Token::new(TokenKind::Constant, lexeme, None);
            },
            LexClass::CharLiteral | LexClass::StringLiteral => {
                return Token::new(TokenKind::StringLit, lexeme, None);
            },
            LexClass::Delimiter => {
                return Token::new(TokenKind::Delimiter, lexeme, token::delimiter_id(lexeme));
            },
            LexClass::Paren => {
                return Token::new(TokenKind::Paren, lexeme, token::delimiter_id(lexeme));
            },
            LexClass::Identifier => {
                if symbols.lookup(lexeme).is_none() {
                    debug!("Auto-registering identifier '{}'", lexeme);
                }
                // First reference to an unknown identifier registers it with
                // the default type in the flat global scope
                let symbol_id: u32 = symbols.declare(lexeme, Type::Integer, 0);
                return Token::new(TokenKind::Identifier, lexeme, Some(symbol_id));
            },
            LexClass::Whitespace => unreachable!("whitespace is discarded before classification")
        }
    }
}

// Splits raw source text into lexemes the way the character-level reader
// does: boundary characters end the current word, two-character operators
// are recognized with one character of lookahead, and spaces are dropped.
pub fn segment(source: &str) -> Vec<String> {
    let boundary_chars: [char; 12] = [' ', ':', '=', '+', '-', '*', '/', '(', ')', ';', '<', '>'];

    let chars: Vec<char> = source.chars().collect();
    let mut lexemes: Vec<String> = Vec::new();
    let mut current: String = String::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c: char = chars[i];

        if boundary_chars.contains(&c) || c.is_whitespace() {
            if !current.is_empty() {
                lexemes.push(current.clone());
                current.clear();
            }

            // Two-character operators are a single lexeme
            let next: Option<char> = chars.get(i + 1).copied();
            match (c, next) {
                (':', Some('=')) | ('<', Some('=')) | ('>', Some('=')) | ('<', Some('>')) => {
                    lexemes.push(format!("{}{}", c, next.unwrap()));
                    i += 2;
                    continue;
                },
                _ => {}
            }

            if !c.is_whitespace() {
                lexemes.push(c.to_string());
            }
            i += 1;
        } else {
            current.push(c);
            i += 1;
        }
    }

    if !current.is_empty() {
        lexemes.push(current);
    }

    return lexemes;
}
