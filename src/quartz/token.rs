use std::fmt;

// The fixed tables of the language. Every entry carries the numeric id that
// shows up in the token stream and the fixed-table report.
pub const RESERVED_WORDS: [(&str, u32); 7] = [
    ("var", 1),
    ("proc", 2),
    ("begin", 3),
    ("end", 4),
    ("integer", 5),
    ("char", 6),
    ("real", 7)
];

pub const OPERATORS: [(&str, u32); 14] = [
    (":=", 101),
    ("+", 102),
    ("-", 103),
    ("*", 104),
    ("/", 105),
    ("=", 106),
    ("<", 107),
    (">", 108),
    ("<=", 109),
    (">=", 110),
    ("<>", 111),
    ("and", 112),
    ("or", 113),
    ("not", 114)
];

pub const DELIMITERS: [(&str, u32); 4] = [
    (":", 201),
    (";", 202),
    ("(", 203),
    (")", 204)
];

// Looks up the id of a reserved word in the fixed table
pub fn reserved_word_id(lexeme: &str) -> Option<u32> {
    return RESERVED_WORDS.iter().find(|(word, _)| *word == lexeme).map(|(_, id)| *id);
}

// Looks up the id of an operator in the fixed table
pub fn operator_id(lexeme: &str) -> Option<u32> {
    return OPERATORS.iter().find(|(op, _)| *op == lexeme).map(|(_, id)| *id);
}

// Looks up the id of a delimiter (parentheses included) in the fixed table
pub fn delimiter_id(lexeme: &str) -> Option<u32> {
    return DELIMITERS.iter().find(|(delim, _)| *delim == lexeme).map(|(_, id)| *id);
}

// Defines a token
#[derive (Debug, Clone, PartialEq)]
pub struct Token {
    // The classification of the token
    pub kind: TokenKind,
    // The lexeme the token was built from
    pub text: String,
    // The fixed-table or symbol-table id, if the token has one
    pub id: Option<u32>
}

impl Token {
    // Create a new token with the given information
    pub fn new(kind: TokenKind, text: &str, id: Option<u32>) -> Self {
        return Token {
            kind,
            text: String::from(text),
            id
        };
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{} '{}'", self.kind, self.text);
    }
}

// Defines the token kinds. The kind fully determines which grammar
// productions may consume the token.
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum (serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    ReservedWord,
    Operator,
    Delimiter,
    Paren,
    Constant,
    #[strum (serialize = "STRING")]
    StringLit,
    Identifier
}
