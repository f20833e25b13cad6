//! co-lex - the lexical analyzer for Co
//!
//! Turns a `.co` source string into a stream of [`Token`]s. The lexer never
//! recovers from an invalid character, an unterminated string, or a
//! malformed number: it returns the first [`co_util::LexerError`] it finds
//! and the caller is expected to stop.
//!
//! # Token categories
//!
//! - Literals: `INT`, `FLOAT`, `BOOL`, `STR`
//! - Identifiers: `IDENTIFIER`
//! - Punctuation: `;` `,` `:` `(` `)` `{` `}` `[` `]`
//! - Arithmetic: `+ - * / // %`
//! - Compound assignment: `= += -= *= /= //= %=`
//! - Comparison: `== != < <= > >=`
//! - Keywords: `var int float bool str and or not if elseif else while for
//!   from to step continue break func void return range`
//!
//! Whitespace is insignificant and `/* ... */` comments (which may span
//! multiple lines) are discarded before the next token is produced.

pub mod cursor;
mod lexer;

pub use lexer::Lexer;

use co_util::Symbol;
use std::fmt;

/// The kind of a token, carrying the decoded literal value where relevant.
///
/// `Int`, `Float`, `Bool`, `Str` and `Identifier` hold the value the source
/// text actually denotes; every other variant is a bare tag for a fixed
/// piece of punctuation or a keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Eof,

    Identifier(Symbol),
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Symbol),

    SemiColon,
    Colon,
    Comma,

    Plus,
    Minus,
    Star,
    Slash,
    DSlash,
    Percent,

    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    DSlashAssign,
    PercentAssign,

    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    KwVar,
    KwInt,
    KwFloat,
    KwBool,
    KwStr,
    KwAnd,
    KwOr,
    KwNot,
    KwIf,
    KwElseif,
    KwElse,
    KwWhile,
    KwFor,
    KwFrom,
    KwTo,
    KwStep,
    KwContinue,
    KwBreak,
    KwFunc,
    KwVoid,
    KwReturn,
    KwRange,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexical token: its kind, the exact source text it was scanned
/// from, and the 1-based line/column of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

/// Maps a keyword spelling to its `TokenKind`, or `None` if `ident` is an
/// ordinary identifier.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "var" => KwVar,
        "int" => KwInt,
        "float" => KwFloat,
        "bool" => KwBool,
        "str" => KwStr,
        "and" => KwAnd,
        "or" => KwOr,
        "not" => KwNot,
        "if" => KwIf,
        "elseif" => KwElseif,
        "else" => KwElse,
        "while" => KwWhile,
        "for" => KwFor,
        "from" => KwFrom,
        "to" => KwTo,
        "step" => KwStep,
        "continue" => KwContinue,
        "break" => KwBreak,
        "func" => KwFunc,
        "void" => KwVoid,
        "return" => KwReturn,
        "range" => KwRange,
        "true" => return Some(Bool(true)),
        "false" => return Some(Bool(false)),
        _ => return None,
    })
}
