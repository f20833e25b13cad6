//! Co's static type lattice.
//!
//! Distinct from [`co_par::ast::VarType`]: every declarable variable has a
//! `VarType`, but an expression's static type also needs `Range`, which can
//! never be named in a declaration - it only ever appears as the type of a
//! `range(...)` call used as a `for` iterable.

use std::fmt;

use co_par::ast::VarType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    Range,
}

impl From<VarType> for Type {
    fn from(ty: VarType) -> Self {
        match ty {
            VarType::Int => Type::Int,
            VarType::Float => Type::Float,
            VarType::Bool => Type::Bool,
            VarType::Str => Type::Str,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::Str => "str",
            Type::Range => "range",
        };
        write!(f, "{}", name)
    }
}

/// A user-defined function's signature. Built-in functions enforce their
/// own arity and argument-type rules directly (see `builtins.rs`) rather
/// than being represented here.
#[derive(Debug, Clone)]
pub struct FuncSig {
    pub params: Vec<Type>,
    pub default_count: usize,
    pub return_type: Option<Type>,
}

impl FuncSig {
    pub fn non_default_count(&self) -> usize {
        self.params.len() - self.default_count
    }
}
