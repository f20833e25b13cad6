//! co-util - shared foundation types for the Co pipeline
//!
//! Every pass of Co (lexer, parser, semantic analyzer, interpreter) is built
//! on a small set of shared types:
//!
//! - [`symbol::Symbol`] - interned identifiers, compared in O(1)
//! - [`span::Span`] - source positions for error reporting
//! - [`index_vec::IndexVec`] - a `Vec` indexed by a typed index instead of
//!   a bare `usize`, used by the scope tree to index ribs
//! - [`error`] - the four pass-specific error types, all formatted as
//!   `<ErrorClass>: <message> on line: <L>, column: <C>`
//!
//! None of these types encode anything about Co's grammar or semantics;
//! they are plumbing that every later crate in the pipeline depends on.

pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use error::{CoError, InterpreterError, LexerError, ParserError, SemanticError};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::Symbol;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
