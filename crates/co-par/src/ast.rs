//! AST node definitions for Co.
//!
//! The same tree produced here is walked independently by both the
//! semantic analyzer and the interpreter; there is no separate lowered
//! representation. Every node carries the [`Span`] of its leading token,
//! which is what error messages from later passes point back to.

use co_util::{Span, Symbol};

/// A full program: a top-level statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A `{ ... }` block, or the implicit top-level block.
pub type Block = Vec<Stmt>;

/// The four declarable variable types. `void` is not one of these - it is
/// only valid as a function's return type, meaning "returns nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Int,
    Float,
    Bool,
    Str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

/// `a[i]` or `a[i:j]`, always on a string-typed base per Co's type rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    Index(Box<Expr>),
    Slice(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(i64, Span),
    FloatLit(f64, Span),
    BoolLit(bool, Span),
    StrLit(Symbol, Span),
    Var(Symbol, Span),
    Unary(UnaryOp, Box<Expr>, Span),
    Binary(Box<Expr>, BinaryOp, Box<Expr>, Span),
    Access(Box<Expr>, Accessor, Span),
    Call(Symbol, Vec<Expr>, Span),
    /// `from start to end (step s)?`. `step` defaults to `1` when absent.
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLit(_, s)
            | Expr::FloatLit(_, s)
            | Expr::BoolLit(_, s)
            | Expr::StrLit(_, s)
            | Expr::Var(_, s)
            | Expr::Unary(_, _, s)
            | Expr::Binary(_, _, _, s)
            | Expr::Access(_, _, s)
            | Expr::Call(_, _, s)
            | Expr::Range { span: s, .. } => *s,
        }
    }
}

/// An assignment's left-hand side: a plain variable or an accessor
/// expression (`a[i]` / `a[i:j]`). Accessor assignment is always rejected
/// by the semantic analyzer because strings are immutable, but it is
/// still valid syntax so the parser has something to point the error at.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Var(Symbol, Span),
    Access(Symbol, Accessor, Span),
}

impl AssignTarget {
    pub fn span(&self) -> Span {
        match self {
            AssignTarget::Var(_, s) => *s,
            AssignTarget::Access(_, _, s) => *s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclEntry {
    pub name: Symbol,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncParam {
    pub name: Symbol,
    pub ty: VarType,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForSource {
    /// `for (... from range(a, b, c?))` - always an `Expr::Range`.
    Range(Expr),
    /// `for (... from s)`, where `s` evaluates to a `str` or a `range` value.
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Empty(Span),
    VarDecl {
        ty: VarType,
        declarations: Vec<VarDeclEntry>,
        span: Span,
    },
    Assign {
        target: AssignTarget,
        value: Expr,
        span: Span,
    },
    /// A call used for its side effects, its result discarded.
    ExprStmt(Expr),
    Conditional {
        /// `if`, then zero or more `elseif`s, each with its own condition.
        branches: Vec<(Expr, Block)>,
        else_branch: Option<Block>,
        span: Span,
    },
    While {
        cond: Expr,
        body: Block,
        span: Span,
    },
    For {
        var: Symbol,
        var_ty: VarType,
        source: ForSource,
        body: Block,
        span: Span,
    },
    Break(Span),
    Continue(Span),
    Return(Option<Expr>, Span),
    FuncDecl {
        name: Symbol,
        params: Vec<FuncParam>,
        return_type: Option<VarType>,
        body: Block,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Empty(s) => *s,
            Stmt::VarDecl { span, .. } => *span,
            Stmt::Assign { span, .. } => *span,
            Stmt::ExprStmt(e) => e.span(),
            Stmt::Conditional { span, .. } => *span,
            Stmt::While { span, .. } => *span,
            Stmt::For { span, .. } => *span,
            Stmt::Break(s) => *s,
            Stmt::Continue(s) => *s,
            Stmt::Return(_, s) => *s,
            Stmt::FuncDecl { span, .. } => *span,
        }
    }
}
