//! The main semantic pass: a depth-first walk of the AST that resolves
//! every name against a [`ScopeTree`] and type-checks every expression and
//! statement against `checker`/`builtins`.
//!
//! Errors are fatal - the first one found aborts the walk and is returned
//! to the caller; there is no recovery or aggregation across errors.

use co_par::ast::{
    Accessor, AssignTarget, Expr, ForSource, FuncParam, Program, Stmt, UnaryOp, VarType,
};
use co_util::{CoError, SemanticError, Span, Symbol};

use crate::builtins;
use crate::checker;
use crate::scope::{ScopeKind, ScopeTree};
use crate::types::{FuncSig, Type};

fn err(message: impl Into<String>, span: Span) -> CoError {
    CoError::Semantic(SemanticError {
        message: message.into(),
        line: span.line,
        column: span.column,
    })
}

pub struct SemanticAnalyzer {
    scopes: ScopeTree,
    /// Set by any `return` statement anywhere in the body currently being
    /// walked, checked once the enclosing `func` finishes and then reset.
    /// A `return` inside a function declared *within* that body also sets
    /// it, which is a faithful quirk of the source language rather than a
    /// bug: a function is considered to "return" if a return statement
    /// appears anywhere lexically inside it, at any nesting depth.
    return_flag: bool,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeTree::new(),
            return_flag: false,
        }
    }

    pub fn analyze(&mut self, program: &Program) -> Result<(), CoError> {
        self.visit_block(&program.statements)
    }

    fn visit_block(&mut self, stmts: &[Stmt]) -> Result<(), CoError> {
        for stmt in stmts {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), CoError> {
        match stmt {
            Stmt::Empty(_) => Ok(()),

            Stmt::VarDecl { ty, declarations, .. } => {
                let declared_ty = Type::from(*ty);
                for entry in declarations {
                    if let Some(init) = &entry.init {
                        let init_ty = self.visit_expr(init)?;
                        checker::check_assignment(declared_ty, init_ty, init.span())?;
                    }
                    if self.scopes.is_declared_in_enclosing_region(entry.name) {
                        return Err(err(
                            format!("Variable \"{}\" is declared again", entry.name.as_str()),
                            entry.span,
                        ));
                    }
                    self.scopes.declare_var(entry.name, declared_ty);
                }
                Ok(())
            }

            Stmt::Assign { target, value, .. } => self.visit_assign(target, value),

            Stmt::ExprStmt(expr) => {
                if let Expr::Call(name, args, span) = expr {
                    self.visit_call(*name, args, *span, true)?;
                    Ok(())
                } else {
                    unreachable!("ExprStmt always wraps a call")
                }
            }

            Stmt::Conditional { branches, else_branch, .. } => {
                for (cond, body) in branches {
                    let cond_ty = self.visit_expr(cond)?;
                    checker::check_condition(cond_ty, cond.span())?;
                    self.scopes.enter(ScopeKind::Conditional);
                    self.visit_block(body)?;
                    self.scopes.exit();
                }
                if let Some(body) = else_branch {
                    self.scopes.enter(ScopeKind::Conditional);
                    self.visit_block(body)?;
                    self.scopes.exit();
                }
                Ok(())
            }

            Stmt::While { cond, body, .. } => {
                let cond_ty = self.visit_expr(cond)?;
                checker::check_condition(cond_ty, cond.span())?;
                self.scopes.enter(ScopeKind::Loop);
                self.visit_block(body)?;
                self.scopes.exit();
                Ok(())
            }

            Stmt::For { var, var_ty, source, body, span } => {
                let elem_ty = match source {
                    ForSource::Range(range_expr) => {
                        self.visit_expr(range_expr)?;
                        Type::Int
                    }
                    ForSource::Expr(expr) => {
                        let iterable_ty = self.visit_expr(expr)?;
                        checker::check_iterable(iterable_ty, expr.span())?;
                        if iterable_ty == Type::Range { Type::Int } else { Type::Str }
                    }
                };
                self.scopes.enter(ScopeKind::Loop);
                let declared_ty = Type::from(*var_ty);
                if self.scopes.is_declared_in_enclosing_region(*var) {
                    return Err(err(
                        format!("Variable \"{}\" is declared again", var.as_str()),
                        *span,
                    ));
                }
                self.scopes.declare_var(*var, declared_ty);
                checker::check_assignment(declared_ty, elem_ty, *span)?;
                self.visit_block(body)?;
                self.scopes.exit();
                Ok(())
            }

            Stmt::Break(span) => {
                if !self.scopes.is_in_loop() {
                    return Err(err("Break statement outside of loop", *span));
                }
                Ok(())
            }

            Stmt::Continue(span) => {
                if !self.scopes.is_in_loop() {
                    return Err(err("Continue statement outside of loop", *span));
                }
                Ok(())
            }

            Stmt::Return(value, span) => {
                let returned_ty = match value {
                    Some(expr) => Some(self.visit_expr(expr)?),
                    None => None,
                };
                let (func_name, declared_ty) = self
                    .scopes
                    .nearest_function()
                    .ok_or_else(|| err("Return statement outside function", *span))?;
                checker::check_return(func_name.as_str(), declared_ty, returned_ty, *span)?;
                self.return_flag = true;
                Ok(())
            }

            Stmt::FuncDecl { name, params, return_type, body, span } => {
                self.visit_func_decl(*name, params, *return_type, body, *span)
            }
        }
    }

    fn visit_assign(&mut self, target: &AssignTarget, value: &Expr) -> Result<(), CoError> {
        match target {
            AssignTarget::Var(name, vspan) => {
                let var_ty = self
                    .scopes
                    .lookup_var(*name)
                    .ok_or_else(|| err(format!("Identifier \"{}\" not found", name.as_str()), *vspan))?;
                let value_ty = self.visit_expr(value)?;
                checker::check_assignment(var_ty, value_ty, value.span())?;
                Ok(())
            }
            AssignTarget::Access(name, _accessor, vspan) => {
                let var_ty = self
                    .scopes
                    .lookup_var(*name)
                    .ok_or_else(|| err(format!("Identifier \"{}\" not found", name.as_str()), *vspan))?;
                // An accessor's base must be a string to be legal at all, and
                // a string accessor can never be an assignment target - so
                // this is unconditionally rejected either way.
                checker::check_accessor_assignment(var_ty, *vspan)?;
                checker::check_accessor(var_ty, *vspan)?;
                Ok(())
            }
        }
    }

    fn visit_func_decl(
        &mut self,
        name: Symbol,
        params: &[FuncParam],
        return_type: Option<VarType>,
        body: &[Stmt],
        span: Span,
    ) -> Result<(), CoError> {
        if self.scopes.lookup_func(name).is_some() {
            return Err(err(format!("Function \"{}\" is declared again", name.as_str()), span));
        }

        let mut seen_default = false;
        for param in params {
            if param.default.is_some() {
                seen_default = true;
            } else if seen_default {
                return Err(err("Non-default parameter follows default parameter", param.span));
            }
        }

        let return_ty = return_type.map(Type::from);
        let param_types: Vec<Type> = params.iter().map(|p| Type::from(p.ty)).collect();
        let default_count = params.iter().filter(|p| p.default.is_some()).count();
        let sig = FuncSig {
            params: param_types,
            default_count,
            return_type: return_ty,
        };
        self.scopes.declare_func(name, sig);

        self.scopes.enter_function(name, return_ty);
        for param in params {
            if let Some(default) = &param.default {
                let default_ty = self.visit_expr(default)?;
                checker::check_assignment(Type::from(param.ty), default_ty, default.span())?;
            }
            self.scopes.declare_var(param.name, Type::from(param.ty));
        }
        self.visit_block(body)?;
        if return_ty.is_some() && !self.return_flag {
            return Err(err(
                format!("Missing return statement for the function \"{}\"", name.as_str()),
                span,
            ));
        }
        self.return_flag = false;
        self.scopes.exit();
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<Type, CoError> {
        match expr {
            Expr::IntLit(..) => Ok(Type::Int),
            Expr::FloatLit(..) => Ok(Type::Float),
            Expr::BoolLit(..) => Ok(Type::Bool),
            Expr::StrLit(..) => Ok(Type::Str),

            Expr::Var(name, span) => self
                .scopes
                .lookup_var(*name)
                .ok_or_else(|| err(format!("Identifier \"{}\" not found", name.as_str()), *span)),

            Expr::Unary(op, operand, span) => {
                let operand_ty = self.visit_expr(operand)?;
                match op {
                    UnaryOp::Not => checker::check_unary_not(operand_ty, *span),
                    UnaryOp::Plus => checker::check_unary_sign("+", operand_ty, *span),
                    UnaryOp::Minus => checker::check_unary_sign("-", operand_ty, *span),
                }
            }

            Expr::Binary(left, op, right, span) => {
                let left_ty = self.visit_expr(left)?;
                let right_ty = self.visit_expr(right)?;
                checker::check_binary_op(*op, left_ty, right_ty, *span)
            }

            Expr::Access(base, accessor, _span) => {
                let base_ty = self.visit_expr(base)?;
                checker::check_accessor(base_ty, base.span())?;
                self.visit_accessor(accessor)?;
                Ok(Type::Str)
            }

            Expr::Call(name, args, span) => {
                let ty = self.visit_call(*name, args, *span, false)?;
                Ok(ty.expect("non-statement calls always yield a type, checked in visit_call"))
            }

            Expr::Range { start, end, step, span } => {
                let start_ty = self.visit_expr(start)?;
                let end_ty = self.visit_expr(end)?;
                let step_ty = match step {
                    Some(step) => Some(self.visit_expr(step)?),
                    None => None,
                };
                checker::check_range_expr(start_ty, end_ty, step_ty, *span)
            }
        }
    }

    fn visit_accessor(&mut self, accessor: &Accessor) -> Result<(), CoError> {
        match accessor {
            Accessor::Index(index) => {
                let index_ty = self.visit_expr(index)?;
                checker::check_index(index_ty, index.span())
            }
            Accessor::Slice(start, end) => {
                let start_ty = self.visit_expr(start)?;
                checker::check_index(start_ty, start.span())?;
                let end_ty = self.visit_expr(end)?;
                checker::check_index(end_ty, end.span())
            }
        }
    }

    /// Resolves and type-checks a call, whether built-in or user-declared.
    /// `is_statement` is `false` when the call's result is used as a value -
    /// a `void` function used that way is a semantic error.
    fn visit_call(
        &mut self,
        name: Symbol,
        args: &[Expr],
        span: Span,
        is_statement: bool,
    ) -> Result<Option<Type>, CoError> {
        let name_str = name.as_str();

        if builtins::is_builtin(name_str) {
            let mut arg_types = Vec::with_capacity(args.len());
            for arg in args {
                arg_types.push(self.visit_expr(arg)?);
            }
            builtins::check_call(name_str, &arg_types, span)?;
            return Ok(builtins::return_type(name_str).unwrap());
        }

        let sig = self
            .scopes
            .lookup_func(name)
            .cloned()
            .ok_or_else(|| err(format!("Function \"{}\" not found", name_str), span))?;

        let num_args = args.len();
        if num_args < sig.non_default_count() || num_args > sig.params.len() {
            let suffix = if sig.params.is_empty() || sig.params.len() == sig.non_default_count() {
                String::new()
            } else {
                format!(" to {}", sig.params.len())
            };
            return Err(err(
                format!(
                    "Function \"{}\" takes {}{} positional arguments but {} were given",
                    name_str,
                    sig.non_default_count(),
                    suffix,
                    num_args
                ),
                span,
            ));
        }

        for (param_ty, arg) in sig.params.iter().zip(args) {
            let arg_ty = self.visit_expr(arg)?;
            checker::check_assignment(*param_ty, arg_ty, arg.span())?;
        }

        if sig.return_type.is_none() && !is_statement {
            return Err(err(
                format!("\"void\" function \"{}\" not allowed here", name_str),
                span,
            ));
        }

        Ok(sig.return_type)
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co_par::Parser;

    fn analyze(src: &str) -> Result<(), CoError> {
        let program = Parser::new(src)?.parse()?;
        SemanticAnalyzer::new().analyze(&program)
    }

    #[test]
    fn accepts_a_well_typed_program() {
        let src = r#"
            func(int) add(var(int) a, var(int) b = 1) {
                return a + b;
            }
            var(int) total = add(2, 3);
            println(total);
        "#;
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn rejects_redeclaring_a_variable_in_the_same_region() {
        let src = "var(int) x = 1; var(int) x = 2;";
        let result = analyze(src);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("declared again"));
    }

    #[test]
    fn a_block_scoped_variable_is_not_visible_outside_its_block() {
        let src = r#"
            if (true) {
                var(int) x = 1;
            }
            var(int) y = x;
        "#;
        let result = analyze(src);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn rejects_break_outside_a_loop() {
        assert!(analyze("break;").is_err());
    }

    #[test]
    fn accepts_break_nested_in_a_conditional_inside_a_loop() {
        let src = r#"
            while (true) {
                if (true) {
                    break;
                }
            }
        "#;
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn rejects_a_function_missing_its_return_statement() {
        let src = "func(int) f() { var(int) x = 1; }";
        let result = analyze(src);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Missing return"));
    }

    #[test]
    fn rejects_assigning_through_a_string_accessor() {
        let src = r#"
            var(str) s = "hi";
            s[0] = "x";
        "#;
        assert!(analyze(src).is_err());
    }

    #[test]
    fn rejects_mismatched_for_loop_variable_type() {
        let src = "for (var(str) i from range(0, 10)) { continue; }";
        assert!(analyze(src).is_err());
    }

    #[test]
    fn accepts_a_for_loop_over_a_string() {
        let src = r#"
            var(str) s = "hi";
            for (var(str) c from s) { continue; }
        "#;
        assert!(analyze(src).is_ok());
    }
}
