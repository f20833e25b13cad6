//! co-sem - the semantic analyzer for Co
//!
//! Walks the [`co_par::ast::Program`] once, resolving every name against a
//! scope tree and checking every expression and statement against Co's
//! static type rules. This pass runs strictly between parsing and
//! interpretation: the interpreter assumes the program it receives has
//! already passed here, and does not re-check names or types itself.
//!
//! Co's type lattice is small and has no implicit conversions beyond
//! int -> float promotion in arithmetic (see [`types::Type`] and
//! [`checker`]). Scope rules track the source language's quirks
//! deliberately: `if`/`while`/`for` bodies are transparent to a
//! redeclaration check but not to ordinary name lookup, and a
//! `break`/`continue` placement check climbs through function boundaries
//! all the way to the global scope (see [`scope::ScopeTree`]).

mod analyzer;
mod builtins;
mod checker;
mod scope;
mod types;

pub use analyzer::SemanticAnalyzer;
pub use scope::{ScopeKind, ScopeTree};
pub use types::{FuncSig, Type};

use co_par::ast::Program;
use co_util::CoError;

/// Runs the full semantic pass over `program`, returning the first error
/// found, if any.
pub fn analyze(program: &Program) -> Result<(), CoError> {
    SemanticAnalyzer::new().analyze(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use co_par::Parser;

    #[test]
    fn analyze_accepts_a_trivial_program() {
        let program = Parser::new("println(\"hi\");").unwrap().parse().unwrap();
        assert!(analyze(&program).is_ok());
    }

    #[test]
    fn analyze_rejects_an_undeclared_identifier() {
        let program = Parser::new("println(missing);").unwrap().parse().unwrap();
        assert!(analyze(&program).is_err());
    }
}
