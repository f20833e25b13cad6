//! Error types shared by every pass of the Co pipeline.
//!
//! Co's error model is intentionally flat: each pass (lexer, parser,
//! semantic analyzer, interpreter) raises at most one error and stops.
//! There is no recovery, no aggregation and no warnings - the first
//! problem found is the only one reported, formatted as
//! `<ErrorClass>: <message> on line: <L>, column: <C>`.

use thiserror::Error;

/// Raised while scanning source text into tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("LexerError: {message} on line: {line}, column: {column}")]
pub struct LexerError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Raised while building the AST from a token stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("ParserError: {message} on line: {line}, column: {column}")]
pub struct ParserError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Raised while resolving names and checking types over the AST.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("SemanticError: {message} on line: {line}, column: {column}")]
pub struct SemanticError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Raised while walking the AST to execute a program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("InterpreterError: {message} on line: {line}, column: {column}")]
pub struct InterpreterError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

pub type LexerResult<T> = std::result::Result<T, LexerError>;
pub type ParserResult<T> = std::result::Result<T, ParserError>;
pub type SemanticResult<T> = std::result::Result<T, SemanticError>;
pub type InterpreterResult<T> = std::result::Result<T, InterpreterError>;

/// A single error from any pass, used by the driver to report a
/// uniform exit message regardless of which pass failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}
