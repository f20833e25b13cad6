//! String interning for identifiers and keywords.
//!
//! A [`Symbol`] is a small, `Copy` handle to an interned string. Comparing
//! two symbols is an integer comparison rather than a byte-by-byte string
//! comparison, which matters once a program has been fully tokenized and
//! its identifiers are compared repeatedly during scope resolution.
//!
//! Co programs run on a single thread (see the interpreter's concurrency
//! notes), so the table backing the interner is a plain `RefCell`-guarded
//! vector rather than a concurrent map.
//!
//! # Examples
//!
//! ```
//! use co_util::symbol::Symbol;
//!
//! let a = Symbol::intern("total");
//! let b = Symbol::intern("total");
//! let c = Symbol::intern("count");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(a.as_str(), "total");
//! ```

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;

thread_local! {
    static TABLE: RefCell<SymbolTable> = RefCell::new(SymbolTable::new());
}

struct SymbolTable {
    strings: Vec<&'static str>,
    indices: FxHashMap<&'static str, u32>,
}

impl SymbolTable {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            indices: FxHashMap::default(),
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(&idx) = self.indices.get(s) {
            return idx;
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = self.strings.len() as u32;
        self.strings.push(leaked);
        self.indices.insert(leaked, idx);
        idx
    }

    fn resolve(&self, idx: u32) -> &'static str {
        self.strings[idx as usize]
    }
}

/// A compact, interned handle to a string.
///
/// Symbols compare and hash as plain `u32`s. The backing string lives for
/// the remainder of the process once interned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `s`, returning a handle that compares equal to every other
    /// handle produced by interning the same text.
    pub fn intern(s: &str) -> Self {
        TABLE.with(|table| Symbol(table.borrow_mut().intern(s)))
    }

    /// Recover the original string for this symbol.
    pub fn as_str(self) -> &'static str {
        TABLE.with(|table| table.borrow().resolve(self.0))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_the_same_symbol() {
        assert_eq!(Symbol::intern("foo"), Symbol::intern("foo"));
    }

    #[test]
    fn distinct_text_interns_to_distinct_symbols() {
        assert_ne!(Symbol::intern("foo"), Symbol::intern("bar"));
    }

    #[test]
    fn round_trips_through_as_str() {
        let sym = Symbol::intern("elseif");
        assert_eq!(sym.as_str(), "elseif");
    }

    #[quickcheck_macros::quickcheck]
    fn interning_any_string_round_trips_through_as_str(s: String) -> bool {
        Symbol::intern(&s).as_str() == s
    }

    #[quickcheck_macros::quickcheck]
    fn interning_the_same_string_twice_yields_equal_symbols(s: String) -> bool {
        Symbol::intern(&s) == Symbol::intern(&s)
    }
}
