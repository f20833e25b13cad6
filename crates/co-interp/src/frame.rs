//! The program stack: a chain of frames mirroring the semantic analyzer's
//! scope tree one for one, plus the runtime state a scope tree has no need
//! for - variable bindings and a frame name for diagnostics.
//!
//! Block frames (`Conditional`, `While`, `For`) alias their enclosing frame: a
//! `while` body assigning to a global must mutate the same binding every
//! later statement sees. A `Func` frame instead carries a private, deep
//! copy of the environment it closed over, captured once at declaration
//! and copied again fresh on every call, so recursive and repeated calls
//! never see each other's mutations and a call can never leak a mutation
//! back out to its caller. [`Frame::deep_clone`] is what makes both of
//! these possible out of the same representation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use co_util::{FxHashMap, Symbol};

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Global,
    Conditional,
    While,
    For,
    Func,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameKind::Global => "GLOBAL",
            FrameKind::Conditional => "CONDITIONAL_STATEMENT",
            FrameKind::While => "WHILE_STATEMENT",
            FrameKind::For => "FOR_STATEMENT",
            FrameKind::Func => "FUNC",
        };
        write!(f, "{}", name)
    }
}

pub struct Frame {
    pub kind: FrameKind,
    pub scope_level: u32,
    /// `None` means declared but never assigned - reading one is a runtime
    /// error, matching Co's "use before assignment" diagnostic.
    bindings: FxHashMap<Symbol, Option<Value>>,
    outer: Option<FrameRef>,
}

pub type FrameRef = Rc<RefCell<Frame>>;

impl Frame {
    pub fn new(kind: FrameKind, outer: Option<FrameRef>) -> FrameRef {
        let scope_level = outer.as_ref().map_or(1, |o| o.borrow().scope_level + 1);
        Rc::new(RefCell::new(Frame {
            kind,
            scope_level,
            bindings: FxHashMap::default(),
            outer,
        }))
    }

    /// Declares `name` in this frame, shadowing any binding of the same
    /// name further out. Declaration never climbs - that's what makes a
    /// `for` loop variable or a function parameter local to its own scope.
    pub fn declare(frame: &FrameRef, name: Symbol, value: Option<Value>) {
        frame.borrow_mut().bindings.insert(name, value);
    }

    /// Walks outward until `name` is found, returning its current binding
    /// (`Some(None)` for a declared-but-unassigned variable). `None` means
    /// the name isn't bound anywhere in the chain, which a well-formed
    /// program - one that already passed semantic analysis - never does.
    pub fn get(frame: &FrameRef, name: Symbol) -> Option<Option<Value>> {
        if let Some(v) = frame.borrow().bindings.get(&name) {
            return Some(v.clone());
        }
        let outer = frame.borrow().outer.clone();
        outer.and_then(|o| Frame::get(&o, name))
    }

    /// Walks outward and assigns the nearest existing binding of `name`.
    /// Returns `false` if no frame in the chain declares `name`.
    pub fn set(frame: &FrameRef, name: Symbol, value: Value) -> bool {
        if frame.borrow().bindings.contains_key(&name) {
            frame.borrow_mut().bindings.insert(name, Some(value));
            return true;
        }
        let outer = frame.borrow().outer.clone();
        match outer {
            Some(o) => Frame::set(&o, name, value),
            None => false,
        }
    }

    /// Recursively copies a frame and its entire outer chain, breaking all
    /// `Rc` sharing. Used to snapshot a function's declaring environment
    /// and, on every call, to hand that snapshot a fresh private copy.
    pub fn deep_clone(frame: &FrameRef) -> FrameRef {
        let f = frame.borrow();
        let outer = f.outer.as_ref().map(Frame::deep_clone);
        Rc::new(RefCell::new(Frame {
            kind: f.kind,
            scope_level: f.scope_level,
            bindings: f.bindings.clone(),
            outer,
        }))
    }
}

/// Tracks the single currently-executing frame. Unlike a flat `Vec`, the
/// outer chain a frame carries *is* its call history for ordinary block
/// scopes, so there is nothing else to keep in sync; a second bookkeeping
/// stack alongside it would just be the same information twice.
pub struct ProgramStack {
    current: FrameRef,
}

impl ProgramStack {
    pub fn new() -> Self {
        Self { current: Frame::new(FrameKind::Global, None) }
    }

    pub fn current(&self) -> &FrameRef {
        &self.current
    }

    /// Pushes a block-scoped frame aliasing the current one.
    pub fn push(&mut self, kind: FrameKind) {
        tracing::trace!(?kind, "push frame");
        self.current = Frame::new(kind, Some(self.current.clone()));
    }

    pub fn pop(&mut self) {
        let outer = self
            .current
            .borrow()
            .outer
            .clone()
            .expect("pop called on the global frame");
        tracing::trace!("pop frame");
        self.current = outer;
    }

    /// Swaps in `frame` - a fresh, isolated call frame - as the current
    /// one, returning the caller's frame so it can be restored with
    /// [`Self::exit_call`] once the call returns. A call can never be
    /// observed to have mutated anything outside itself because `frame`
    /// shares no `Rc` with the caller's chain.
    pub fn enter_call(&mut self, frame: FrameRef) -> FrameRef {
        tracing::trace!("push call frame");
        std::mem::replace(&mut self.current, frame)
    }

    pub fn exit_call(&mut self, caller: FrameRef) {
        tracing::trace!("pop call frame");
        self.current = caller;
    }
}

impl Default for ProgramStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_block_frame_mutates_the_shared_outer_binding() {
        let mut stack = ProgramStack::new();
        let x = Symbol::intern("x");
        Frame::declare(stack.current(), x, Some(Value::Int(1)));
        stack.push(FrameKind::While);
        assert!(Frame::set(stack.current(), x, Value::Int(2)));
        stack.pop();
        assert_eq!(Frame::get(stack.current(), x), Some(Some(Value::Int(2))));
    }

    #[test]
    fn a_deep_clone_does_not_see_later_mutations_to_the_original() {
        let mut stack = ProgramStack::new();
        let x = Symbol::intern("x");
        Frame::declare(stack.current(), x, Some(Value::Int(1)));
        let snapshot = Frame::deep_clone(stack.current());
        Frame::set(stack.current(), x, Value::Int(99));
        assert_eq!(Frame::get(&snapshot, x), Some(Some(Value::Int(1))));
    }

    #[test]
    fn a_call_frame_mutation_never_escapes_the_call() {
        let mut stack = ProgramStack::new();
        let x = Symbol::intern("x");
        Frame::declare(stack.current(), x, Some(Value::Int(1)));
        let prototype = Frame::deep_clone(stack.current());
        let call_frame = Frame::deep_clone(&prototype);
        let caller = stack.enter_call(call_frame);
        Frame::set(stack.current(), x, Value::Int(42));
        stack.exit_call(caller);
        assert_eq!(Frame::get(stack.current(), x), Some(Some(Value::Int(1))));
    }
}
