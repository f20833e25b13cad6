//! Scope tree for name resolution during semantic analysis.
//!
//! Mirrors the shape of the interpreter's program stack one-to-one: scopes
//! are pushed on entry to a function, conditional branch or loop body and
//! popped on exit, each carrying a parent link instead of owning its
//! children directly.

use co_util::index_vec::{define_idx, IndexVec};
use co_util::FxHashMap;
use co_util::Symbol;

use crate::types::{FuncSig, Type};

define_idx!(ScopeId);

/// `if`/`elseif`/`else`/`while`/`for` bodies are *transparent*: a
/// redeclaration check run with `check_outer = false` still climbs through
/// them, so a block cannot shadow a name already bound in its enclosing
/// function or the global scope. `Function` and `Global` are opaque - the
/// climb stops there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Conditional,
    Loop,
}

impl ScopeKind {
    fn is_transparent(self) -> bool {
        matches!(self, ScopeKind::Conditional | ScopeKind::Loop)
    }
}

struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    vars: FxHashMap<Symbol, Type>,
    funcs: FxHashMap<Symbol, FuncSig>,
    /// Set only on `Function`-kind scopes: the function's own name and
    /// declared return type, so a `return` deep inside the body can check
    /// itself without re-resolving through the declaring scope.
    func_ctx: Option<(Symbol, Option<Type>)>,
}

pub struct ScopeTree {
    scopes: IndexVec<ScopeId, Scope>,
    current: ScopeId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let global = scopes.push(Scope {
            kind: ScopeKind::Global,
            parent: None,
            vars: FxHashMap::default(),
            funcs: FxHashMap::default(),
            func_ctx: None,
        });
        Self {
            scopes,
            current: global,
        }
    }

    pub fn enter(&mut self, kind: ScopeKind) {
        let child = self.scopes.push(Scope {
            kind,
            parent: Some(self.current),
            vars: FxHashMap::default(),
            funcs: FxHashMap::default(),
            func_ctx: None,
        });
        self.current = child;
    }

    /// Pushes a `Function` scope carrying its own name and declared return
    /// type, so a `return` anywhere in the body can check itself directly.
    pub fn enter_function(&mut self, name: Symbol, return_type: Option<Type>) {
        let child = self.scopes.push(Scope {
            kind: ScopeKind::Function,
            parent: Some(self.current),
            vars: FxHashMap::default(),
            funcs: FxHashMap::default(),
            func_ctx: Some((name, return_type)),
        });
        self.current = child;
    }

    pub fn exit(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    pub fn declare_var(&mut self, name: Symbol, ty: Type) {
        self.scopes[self.current].vars.insert(name, ty);
    }

    pub fn declare_func(&mut self, name: Symbol, sig: FuncSig) {
        self.scopes[self.current].funcs.insert(name, sig);
    }

    /// Unqualified name resolution: climbs outward unconditionally,
    /// regardless of scope kind.
    pub fn lookup_var(&self, name: Symbol) -> Option<Type> {
        let mut id = Some(self.current);
        while let Some(cur) = id {
            if let Some(ty) = self.scopes[cur].vars.get(&name) {
                return Some(*ty);
            }
            id = self.scopes[cur].parent;
        }
        None
    }

    pub fn lookup_func(&self, name: Symbol) -> Option<&FuncSig> {
        let mut id = Some(self.current);
        while let Some(cur) = id {
            if let Some(sig) = self.scopes[cur].funcs.get(&name) {
                return Some(sig);
            }
            id = self.scopes[cur].parent;
        }
        None
    }

    /// The redeclaration check: is `name` visible without climbing past a
    /// function or global boundary? Transparent (block) scopes are climbed
    /// through; a `Function` or `Global` scope stops the search at itself.
    pub fn is_declared_in_enclosing_region(&self, name: Symbol) -> bool {
        let mut id = self.current;
        loop {
            let scope = &self.scopes[id];
            if scope.vars.contains_key(&name) {
                return true;
            }
            if !scope.kind.is_transparent() {
                return false;
            }
            match scope.parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Walks outward from the current scope, through every kind of scope
    /// (including function bodies), until the global scope, looking for an
    /// enclosing loop. Used for `break`/`continue` placement checks.
    pub fn is_in_loop(&self) -> bool {
        let mut id = self.current;
        loop {
            let scope = &self.scopes[id];
            if matches!(scope.kind, ScopeKind::Loop) {
                return true;
            }
            match scope.parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Walks outward to the nearest enclosing `Function` scope (not all the
    /// way to global), returning its name and declared return type. Used
    /// for `return` placement checks.
    pub fn nearest_function(&self) -> Option<(Symbol, Option<Type>)> {
        let mut id = self.current;
        loop {
            if let Some(ctx) = self.scopes[id].func_ctx {
                return Some(ctx);
            }
            match self.scopes[id].parent {
                Some(parent) => id = parent,
                None => return None,
            }
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_climbs_all_enclosing_scopes() {
        let mut tree = ScopeTree::new();
        let x = Symbol::intern("x");
        tree.declare_var(x, Type::Int);
        tree.enter(ScopeKind::Conditional);
        tree.enter(ScopeKind::Loop);
        assert_eq!(tree.lookup_var(x), Some(Type::Int));
    }

    #[test]
    fn redeclaration_check_sees_through_transparent_blocks() {
        let mut tree = ScopeTree::new();
        let x = Symbol::intern("x");
        tree.declare_var(x, Type::Int);
        tree.enter(ScopeKind::Conditional);
        assert!(tree.is_declared_in_enclosing_region(x));
    }

    #[test]
    fn redeclaration_check_stops_at_a_function_boundary() {
        let mut tree = ScopeTree::new();
        let x = Symbol::intern("x");
        tree.declare_var(x, Type::Int);
        tree.enter(ScopeKind::Function);
        assert!(!tree.is_declared_in_enclosing_region(x));
    }

    #[test]
    fn is_in_loop_finds_an_enclosing_loop_through_a_conditional() {
        let mut tree = ScopeTree::new();
        tree.enter(ScopeKind::Loop);
        tree.enter(ScopeKind::Conditional);
        assert!(tree.is_in_loop());
    }

    #[test]
    fn nearest_function_stops_at_the_first_function_scope() {
        let mut tree = ScopeTree::new();
        let f = Symbol::intern("f");
        tree.enter_function(f, Some(Type::Int));
        tree.enter(ScopeKind::Conditional);
        let (name, return_type) = tree.nearest_function().unwrap();
        assert_eq!(name, f);
        assert_eq!(return_type, Some(Type::Int));
    }
}
