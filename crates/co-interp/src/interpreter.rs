//! The tree-walking interpreter. Runs once over a [`Program`] that has
//! already passed semantic analysis - every name resolves, every
//! expression is well-typed, every `return`/`break`/`continue` is legally
//! placed - so this pass never re-checks any of that and panics on the
//! rare state that would mean it's false (see the `unreachable!` sites
//! below).

use std::fmt;

use co_par::ast::{
    Accessor, AssignTarget, BinaryOp, Expr, ForSource, FuncParam, Program, Stmt, UnaryOp,
};
use co_util::{CoError, FxHashMap, InterpreterError, Span, Symbol};

use crate::builtins;
use crate::frame::{Frame, FrameKind, FrameRef, ProgramStack};
use crate::value::Value;

fn err(message: impl Into<String>, span: Span) -> CoError {
    CoError::Interpreter(InterpreterError {
        message: message.into(),
        line: span.line,
        column: span.column,
    })
}

/// What a statement or block just did, threaded up through every level
/// of nesting that a `break`/`continue`/`return` needs to pass through.
/// Chosen over three mutable flags (the source's approach) because it
/// composes with exhaustive `match` instead of needing every caller to
/// remember to check three booleans in the right order.
#[derive(Debug)]
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Option<Value>),
}

/// A declared function's call-independent state: its parameter order,
/// its body, and the frame it closed over - captured once, at
/// declaration, with every default-parameter expression already
/// evaluated. See [`Frame::deep_clone`] for how a call turns this into
/// an isolated activation.
struct FuncProto<'a> {
    param_names: Vec<Symbol>,
    body: &'a [Stmt],
    prototype: FrameRef,
}

pub struct Interpreter<'a> {
    stack: ProgramStack,
    functions: FxHashMap<Symbol, FuncProto<'a>>,
}

impl<'a> Interpreter<'a> {
    pub fn new() -> Self {
        Self { stack: ProgramStack::new(), functions: FxHashMap::default() }
    }

    pub fn run(&mut self, program: &'a Program) -> Result<(), CoError> {
        self.exec_block(&program.statements)?;
        Ok(())
    }

    fn exec_block(&mut self, stmts: &'a [Stmt]) -> Result<Flow, CoError> {
        for stmt in stmts {
            let flow = self.exec_stmt(stmt)?;
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &'a Stmt) -> Result<Flow, CoError> {
        match stmt {
            Stmt::Empty(_) => Ok(Flow::Normal),
            Stmt::VarDecl { declarations, .. } => {
                for decl in declarations {
                    let value = match &decl.init {
                        Some(expr) => Some(self.eval_expr(expr)?),
                        None => None,
                    };
                    Frame::declare(self.stack.current(), decl.name, value);
                }
                Ok(Flow::Normal)
            }
            Stmt::Assign { target, value, .. } => {
                let value = self.eval_expr(value)?;
                match target {
                    AssignTarget::Var(name, span) => {
                        if !Frame::set(self.stack.current(), *name, value) {
                            panic!(
                                "variable \"{}\" not bound at runtime despite passing semantic analysis (line {})",
                                name.as_str(),
                                span.line
                            );
                        }
                    }
                    AssignTarget::Access(..) => {
                        unreachable!("accessor assignment is always rejected by semantic analysis")
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::ExprStmt(expr) => {
                match expr {
                    Expr::Call(name, args, span) => {
                        let mut values = Vec::with_capacity(args.len());
                        for arg in args {
                            values.push(self.eval_expr(arg)?);
                        }
                        self.eval_call(*name, values, *span)?;
                    }
                    _ => unreachable!("ExprStmt always wraps a call"),
                }
                Ok(Flow::Normal)
            }
            Stmt::Conditional { branches, else_branch, .. } => {
                for (cond, body) in branches {
                    if self.eval_bool(cond)? {
                        self.stack.push(FrameKind::Conditional);
                        let flow = self.exec_block(body);
                        self.stack.pop();
                        return flow;
                    }
                }
                if let Some(body) = else_branch {
                    self.stack.push(FrameKind::Conditional);
                    let flow = self.exec_block(body);
                    self.stack.pop();
                    return flow;
                }
                Ok(Flow::Normal)
            }
            Stmt::While { cond, body, .. } => {
                self.stack.push(FrameKind::While);
                let mut flow = Flow::Normal;
                loop {
                    match self.eval_bool(cond) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            self.stack.pop();
                            return Err(e);
                        }
                    }
                    match self.exec_block(body) {
                        Ok(Flow::Normal) | Ok(Flow::Continue) => continue,
                        Ok(Flow::Break) => break,
                        Ok(Flow::Return(v)) => {
                            flow = Flow::Return(v);
                            break;
                        }
                        Err(e) => {
                            self.stack.pop();
                            return Err(e);
                        }
                    }
                }
                self.stack.pop();
                Ok(flow)
            }
            Stmt::For { var, source, body, .. } => {
                let values = self.eval_for_source(source)?;
                self.stack.push(FrameKind::For);
                Frame::declare(self.stack.current(), *var, None);
                let mut flow = Flow::Normal;
                for value in values {
                    Frame::declare(self.stack.current(), *var, Some(value));
                    match self.exec_block(body) {
                        Ok(Flow::Normal) | Ok(Flow::Continue) => continue,
                        Ok(Flow::Break) => break,
                        Ok(Flow::Return(v)) => {
                            flow = Flow::Return(v);
                            break;
                        }
                        Err(e) => {
                            self.stack.pop();
                            return Err(e);
                        }
                    }
                }
                self.stack.pop();
                Ok(flow)
            }
            Stmt::Break(_) => Ok(Flow::Break),
            Stmt::Continue(_) => Ok(Flow::Continue),
            Stmt::Return(value, _) => {
                let value = match value {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            }
            Stmt::FuncDecl { name, params, body, .. } => {
                self.declare_func(*name, params, body)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Captures the function's declaring environment, evaluates every
    /// default-parameter expression exactly once, and registers the
    /// result. Non-default parameters are bound to nothing until a call
    /// supplies them.
    fn declare_func(&mut self, name: Symbol, params: &'a [FuncParam], body: &'a [Stmt]) -> Result<(), CoError> {
        let outer = Frame::deep_clone(self.stack.current());
        let prototype = Frame::new(FrameKind::Func, Some(outer));
        let mut param_names = Vec::with_capacity(params.len());
        for param in params {
            let value = match &param.default {
                Some(default_expr) => Some(self.eval_expr(default_expr)?),
                None => None,
            };
            Frame::declare(&prototype, param.name, value);
            param_names.push(param.name);
        }
        self.functions.insert(name, FuncProto { param_names, body, prototype });
        Ok(())
    }

    fn eval_for_source(&mut self, source: &'a ForSource) -> Result<Vec<Value>, CoError> {
        match source {
            ForSource::Range(Expr::Range { start, end, step, span }) => {
                self.eval_range(start, end, step.as_deref(), *span)
            }
            ForSource::Range(_) => unreachable!("ForSource::Range always wraps an Expr::Range"),
            ForSource::Expr(expr) => match self.eval_expr(expr)? {
                Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
                _ => unreachable!("for-loop iterable type is checked by semantic analysis"),
            },
        }
    }

    fn eval_range(
        &mut self,
        start: &'a Expr,
        end: &'a Expr,
        step: Option<&'a Expr>,
        span: Span,
    ) -> Result<Vec<Value>, CoError> {
        let start = as_int(self.eval_expr(start)?);
        let end = as_int(self.eval_expr(end)?);
        let step = match step {
            Some(expr) => as_int(self.eval_expr(expr)?),
            None => 1,
        };
        if step == 0 {
            return Err(err("Range step cannot be zero", span));
        }
        let mut values = Vec::new();
        let mut current = start;
        if step > 0 {
            while current <= end {
                values.push(Value::Int(current));
                current += step;
            }
        } else {
            while current >= end {
                values.push(Value::Int(current));
                current += step;
            }
        }
        Ok(values)
    }

    fn eval_bool(&mut self, expr: &'a Expr) -> Result<bool, CoError> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            _ => unreachable!("condition type is checked by semantic analysis"),
        }
    }

    fn eval_expr(&mut self, expr: &'a Expr) -> Result<Value, CoError> {
        match expr {
            Expr::IntLit(v, _) => Ok(Value::Int(*v)),
            Expr::FloatLit(v, _) => Ok(Value::Float(*v)),
            Expr::BoolLit(v, _) => Ok(Value::Bool(*v)),
            Expr::StrLit(s, _) => Ok(Value::Str(s.as_str().to_string())),
            Expr::Var(name, span) => match Frame::get(self.stack.current(), *name) {
                Some(Some(value)) => Ok(value),
                Some(None) => Err(err(format!("Variable \"{}\" is not defined", name.as_str()), *span)),
                None => panic!(
                    "variable \"{}\" not bound at runtime despite passing semantic analysis (line {})",
                    name.as_str(),
                    span.line
                ),
            },
            Expr::Unary(op, operand, span) => {
                let value = self.eval_expr(operand)?;
                self.eval_unary(*op, value, *span)
            }
            Expr::Binary(left, op, right, span) => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                self.eval_binary(*op, left, right, *span)
            }
            Expr::Access(base, accessor, span) => {
                let base = self.eval_expr(base)?;
                let s = match base {
                    Value::Str(s) => s,
                    _ => unreachable!("accessor base type is checked by semantic analysis"),
                };
                self.eval_accessor(&s, accessor, *span)
            }
            Expr::Call(name, args, span) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }
                let result = self.eval_call(*name, values, *span)?;
                Ok(result.unwrap_or_else(|| {
                    panic!(
                        "void call to \"{}\" used as a value despite passing semantic analysis",
                        name.as_str()
                    )
                }))
            }
            Expr::Range { .. } => {
                unreachable!("range expressions only ever appear in a for-loop header")
            }
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: Value, span: Span) -> Result<Value, CoError> {
        match (op, operand) {
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Plus, Value::Int(i)) => Ok(Value::Int(i)),
            (UnaryOp::Plus, Value::Float(f)) => Ok(Value::Float(f)),
            (UnaryOp::Minus, Value::Int(i)) => Ok(Value::Int(-i)),
            (UnaryOp::Minus, Value::Float(f)) => Ok(Value::Float(-f)),
            _ => unreachable!("unary operand type is checked by semantic analysis, span {:?}", span),
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: Value, right: Value, span: Span) -> Result<Value, CoError> {
        use BinaryOp::*;

        if matches!(op, Add) && (matches!(left, Value::Str(_)) || matches!(right, Value::Str(_))) {
            return Ok(Value::Str(format!("{}{}", left, right)));
        }
        if matches!(op, Mul) {
            if let (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) = (&left, &right) {
                return Ok(Value::Str(s.repeat((*n).max(0) as usize)));
            }
        }

        match op {
            Add | Sub | Mul | Div | IDiv | Mod => self.eval_arithmetic(op, left, right, span),
            Eq => Ok(Value::Bool(left == right)),
            NotEq => Ok(Value::Bool(left != right)),
            Lt | LtEq | Gt | GtEq => Ok(Value::Bool(eval_comparison(op, &left, &right))),
            And => Ok(Value::Bool(truthy(&left) && truthy(&right))),
            Or => Ok(Value::Bool(truthy(&left) || truthy(&right))),
        }
    }

    fn eval_arithmetic(&mut self, op: BinaryOp, left: Value, right: Value, span: Span) -> Result<Value, CoError> {
        use BinaryOp::*;

        let either_float = matches!(left, Value::Float(_)) || matches!(right, Value::Float(_));
        let lf = as_f64(&left);
        let rf = as_f64(&right);

        match op {
            Add => Ok(if either_float { Value::Float(lf + rf) } else { Value::Int(as_int(left) + as_int(right)) }),
            Sub => Ok(if either_float { Value::Float(lf - rf) } else { Value::Int(as_int(left) - as_int(right)) }),
            Mul => Ok(if either_float { Value::Float(lf * rf) } else { Value::Int(as_int(left) * as_int(right)) }),
            Div => {
                if rf == 0.0 {
                    return Err(err("Division by zero detected", span));
                }
                Ok(if either_float { Value::Float(lf / rf) } else { Value::Int(as_int(left) / as_int(right)) })
            }
            IDiv => {
                if rf == 0.0 {
                    return Err(err("Division by zero detected", span));
                }
                Ok(Value::Int((lf / rf).floor() as i64))
            }
            Mod => {
                if rf == 0.0 {
                    return Err(err("Modulo by zero detected", span));
                }
                Ok(if either_float {
                    Value::Float(lf - (lf / rf).floor() * rf)
                } else {
                    let (a, b) = (as_int(left), as_int(right));
                    Value::Int(((a % b) + b) % b)
                })
            }
            _ => unreachable!("eval_arithmetic called with non-arithmetic op"),
        }
    }

    fn eval_accessor(&mut self, s: &str, accessor: &'a Accessor, span: Span) -> Result<Value, CoError> {
        let chars: Vec<char> = s.chars().collect();
        let len = chars.len() as i64;
        match accessor {
            Accessor::Index(index_expr) => {
                let idx = as_int(self.eval_expr(index_expr)?);
                if out_of_range(len, idx) {
                    return Err(err(format!("Index out of range: \"[{}]\"", idx), span));
                }
                let actual = normalize_index(len, idx);
                Ok(Value::Str(chars[actual..].iter().collect()))
            }
            Accessor::Slice(start_expr, end_expr) => {
                let start = as_int(self.eval_expr(start_expr)?);
                let end = as_int(self.eval_expr(end_expr)?);
                if out_of_range(len, start) {
                    return Err(err(format!("Index out of range: \"[{}:{}]\"", start, end), span));
                }
                let actual_start = normalize_index(len, start);
                let actual_end = normalize_index(len, end.min(len)).max(actual_start);
                Ok(Value::Str(chars[actual_start..actual_end].iter().collect()))
            }
        }
    }

    fn eval_call(&mut self, name: Symbol, args: Vec<Value>, span: Span) -> Result<Option<Value>, CoError> {
        if builtins::is_builtin(name.as_str()) {
            builtins::call(name.as_str(), args, span)
        } else {
            self.call_user_function(name, args, span)
        }
    }

    fn call_user_function(&mut self, name: Symbol, args: Vec<Value>, _span: Span) -> Result<Option<Value>, CoError> {
        let (body, param_names, prototype) = {
            let proto = self
                .functions
                .get(&name)
                .unwrap_or_else(|| panic!("function \"{}\" not registered despite passing semantic analysis", name.as_str()));
            (proto.body, proto.param_names.clone(), proto.prototype.clone())
        };

        let call_frame = Frame::deep_clone(&prototype);
        for (param_name, value) in param_names.into_iter().zip(args) {
            Frame::declare(&call_frame, param_name, Some(value));
        }

        let caller = self.stack.enter_call(call_frame);
        let flow = self.exec_block(body);
        self.stack.exit_call(caller);

        match flow? {
            Flow::Return(value) => Ok(value),
            _ => Ok(None),
        }
    }
}

impl<'a> Default for Interpreter<'a> {
    fn default() -> Self {
        Self::new()
    }
}

fn as_int(value: Value) -> i64 {
    match value {
        Value::Int(i) => i,
        _ => unreachable!("as_int called on a non-int value - type checked by semantic analysis"),
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => unreachable!("as_f64 called on a non-numeric value - type checked by semantic analysis"),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Str(s) => !s.is_empty(),
    }
}

fn eval_comparison(op: BinaryOp, left: &Value, right: &Value) -> bool {
    use std::cmp::Ordering;
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => as_f64(left).partial_cmp(&as_f64(right)).unwrap_or(Ordering::Equal),
    };
    match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => unreachable!("eval_comparison called with a non-comparison op"),
    }
}

/// Mirrors the source's bounds check: an index (or a slice's start) is
/// out of range when its magnitude reaches the string's length, in
/// either direction - `-len` is out of range just as `len` is.
fn out_of_range(len: i64, idx: i64) -> bool {
    idx.unsigned_abs() as i64 >= len.max(1) || len == 0
}

fn normalize_index(len: i64, idx: i64) -> usize {
    (if idx >= 0 { idx } else { len + idx }).clamp(0, len) as usize
}

impl fmt::Debug for Interpreter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co_par::Parser;

    fn run(src: &str) -> Result<(), CoError> {
        let program = Parser::new(src).unwrap().parse().unwrap();
        Interpreter::new().run(&program)
    }

    #[test]
    fn runs_a_trivial_program() {
        assert!(run("println(\"hi\");").is_ok());
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let err = run("var(int) x = 1 / 0;").unwrap_err();
        assert!(err.to_string().contains("Division by zero detected"));
    }

    #[test]
    fn modulo_by_zero_is_a_runtime_error() {
        let err = run("var(int) x = 1 % 0;").unwrap_err();
        assert!(err.to_string().contains("Modulo by zero detected"));
    }

    #[test]
    fn reading_an_unassigned_variable_is_a_runtime_error() {
        let err = run("var(int) x; println(x);").unwrap_err();
        assert!(err.to_string().contains("Variable \"x\" is not defined"));
    }

    #[test]
    fn range_iteration_is_inclusive_of_the_end() {
        let src = r#"
            var(int) total = 0;
            for (var(int) i from range(1, 3)) {
                total += i;
            }
            println(total);
        "#;
        assert!(run(src).is_ok());
    }

    #[test]
    fn recursive_function_calls_share_the_defined_funcs_registry() {
        let src = r#"
            func(int) fib(var(int) n) {
                if (n < 2) {
                    return n;
                } else {
                    return fib(n - 1) + fib(n - 2);
                }
            }
            var(int) r = fib(7);
            println(r);
        "#;
        assert!(run(src).is_ok());
    }

    #[test]
    fn a_return_inside_a_for_loop_halts_the_native_loop() {
        let src = r#"
            func(int) first_even(var(int) limit) {
                for (var(int) i from range(0, limit)) {
                    if (i % 2 == 0) {
                        return i;
                    }
                }
                return -1;
            }
            println(first_even(9));
        "#;
        assert!(run(src).is_ok());
    }

    #[test]
    fn a_function_call_cannot_mutate_the_caller_s_global() {
        let src = r#"
            var(int) x = 1;
            func(void) bump() {
                x = 99;
            }
        "#;
        let program = Parser::new(src).unwrap().parse().unwrap();
        let mut interp = Interpreter::new();
        interp.run(&program).unwrap();
    }
}
