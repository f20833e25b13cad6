//! Statement parsing: declarations, assignment, control flow, functions.
//!
//! `;` is not a general statement separator: the grammar only appends it
//! after `var_decl`, `assignment` and a bare `func_call`, since every
//! other statement kind is self-delimited by a trailing `}`. A lone `;`
//! is itself the `empty` statement.

use co_lex::TokenKind;

use crate::ast::*;
use crate::{ParseResult, Parser};

impl<'a> Parser<'a> {
    pub(crate) fn statement_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Eof) && !self.check(&TokenKind::RBrace) {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    pub(crate) fn block(&mut self) -> ParseResult<Block> {
        self.eat(&TokenKind::LBrace)?;
        let statements = self.statement_list()?;
        self.eat(&TokenKind::RBrace)?;
        Ok(statements)
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.current().kind {
            TokenKind::SemiColon => {
                let span = self.span();
                self.advance()?;
                Ok(Stmt::Empty(span))
            }
            TokenKind::KwVar => self.var_decl_stmt(),
            TokenKind::Identifier(_) => self.assign_or_call_stmt(),
            TokenKind::KwIf => self.conditional_stmt(),
            TokenKind::KwWhile => self.while_stmt(),
            TokenKind::KwFor => self.for_stmt(),
            TokenKind::KwBreak => {
                let span = self.span();
                self.advance()?;
                self.eat(&TokenKind::SemiColon)?;
                Ok(Stmt::Break(span))
            }
            TokenKind::KwContinue => {
                let span = self.span();
                self.advance()?;
                self.eat(&TokenKind::SemiColon)?;
                Ok(Stmt::Continue(span))
            }
            TokenKind::KwReturn => self.return_stmt(),
            TokenKind::KwFunc => self.func_decl_stmt(),
            ref other => Err(self.error(format!("Unexpected token \"{}\"", other))),
        }
    }

    pub(crate) fn var_type(&mut self) -> ParseResult<VarType> {
        let ty = match self.current().kind {
            TokenKind::KwInt => VarType::Int,
            TokenKind::KwFloat => VarType::Float,
            TokenKind::KwBool => VarType::Bool,
            TokenKind::KwStr => VarType::Str,
            ref other => {
                return Err(self.error(format!("Expected a type but got \"{}\"", other)))
            }
        };
        self.advance()?;
        Ok(ty)
    }

    /// `'(' (type | 'void') ')'`, used by both a function's return type and
    /// nowhere else - parameters and variable declarations always name a
    /// concrete type.
    fn paren_type_or_void(&mut self) -> ParseResult<Option<VarType>> {
        self.eat(&TokenKind::LParen)?;
        let ty = if self.eat_if(&TokenKind::KwVoid)? {
            None
        } else {
            Some(self.var_type()?)
        };
        self.eat(&TokenKind::RParen)?;
        Ok(ty)
    }

    fn var_decl_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.eat(&TokenKind::KwVar)?;
        self.eat(&TokenKind::LParen)?;
        let ty = self.var_type()?;
        self.eat(&TokenKind::RParen)?;

        let mut declarations = vec![self.var_decl_entry()?];
        while self.eat_if(&TokenKind::Comma)? {
            declarations.push(self.var_decl_entry()?);
        }
        self.eat(&TokenKind::SemiColon)?;

        Ok(Stmt::VarDecl {
            ty,
            declarations,
            span,
        })
    }

    fn var_decl_entry(&mut self) -> ParseResult<VarDeclEntry> {
        let span = self.span();
        let name = self.identifier_symbol()?;
        let init = if self.eat_if(&TokenKind::Assign)? {
            Some(self.expr()?)
        } else {
            None
        };
        Ok(VarDeclEntry { name, init, span })
    }

    fn assign_or_call_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        let name = self.identifier_symbol()?;

        if self.check(&TokenKind::LParen) {
            let args = self.call_args()?;
            self.eat(&TokenKind::SemiColon)?;
            return Ok(Stmt::ExprStmt(Expr::Call(name, args, span)));
        }

        let target = if self.check(&TokenKind::LBracket) {
            let accessor = self.accessor()?;
            AssignTarget::Access(name, accessor, span)
        } else {
            AssignTarget::Var(name, span)
        };

        let stmt = self.assign_rest(target, span)?;
        self.eat(&TokenKind::SemiColon)?;
        Ok(stmt)
    }

    /// Parses the operator and right-hand side of an assignment,
    /// desugaring any compound form (`+=`, `-=`, ...) into a plain
    /// assignment of a `BinaryOp` over the target's current value.
    fn assign_rest(&mut self, target: AssignTarget, span: Span) -> ParseResult<Stmt> {
        let compound_op = match self.current().kind {
            TokenKind::PlusAssign => Some(BinaryOp::Add),
            TokenKind::MinusAssign => Some(BinaryOp::Sub),
            TokenKind::StarAssign => Some(BinaryOp::Mul),
            TokenKind::SlashAssign => Some(BinaryOp::Div),
            TokenKind::DSlashAssign => Some(BinaryOp::IDiv),
            TokenKind::PercentAssign => Some(BinaryOp::Mod),
            _ => None,
        };

        let value = if let Some(op) = compound_op {
            self.advance()?;
            let lhs = target_to_expr(&target);
            let rhs = self.expr()?;
            Expr::Binary(Box::new(lhs), op, Box::new(rhs), span)
        } else {
            self.eat(&TokenKind::Assign)?;
            self.expr()?
        };

        Ok(Stmt::Assign {
            target,
            value,
            span,
        })
    }

    fn conditional_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.eat(&TokenKind::KwIf)?;
        self.eat(&TokenKind::LParen)?;
        let cond = self.expr()?;
        self.eat(&TokenKind::RParen)?;
        let body = self.block()?;
        let mut branches = vec![(cond, body)];

        while self.check(&TokenKind::KwElseif) {
            self.advance()?;
            self.eat(&TokenKind::LParen)?;
            let cond = self.expr()?;
            self.eat(&TokenKind::RParen)?;
            let body = self.block()?;
            branches.push((cond, body));
        }

        let else_branch = if self.eat_if(&TokenKind::KwElse)? {
            Some(self.block()?)
        } else {
            None
        };

        Ok(Stmt::Conditional {
            branches,
            else_branch,
            span,
        })
    }

    fn while_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.eat(&TokenKind::KwWhile)?;
        self.eat(&TokenKind::LParen)?;
        let cond = self.expr()?;
        self.eat(&TokenKind::RParen)?;
        let body = self.block()?;
        Ok(Stmt::While { cond, body, span })
    }

    /// `'for' '(' 'var' '(' type ')' identifier 'from' (range_expr | logical_expr) ')' block`
    fn for_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.eat(&TokenKind::KwFor)?;
        self.eat(&TokenKind::LParen)?;
        self.eat(&TokenKind::KwVar)?;
        self.eat(&TokenKind::LParen)?;
        let var_ty = self.var_type()?;
        self.eat(&TokenKind::RParen)?;
        let var = self.identifier_symbol()?;
        self.eat(&TokenKind::KwFrom)?;

        let source = if self.check(&TokenKind::KwRange) {
            ForSource::Range(self.range_expr()?)
        } else {
            ForSource::Expr(self.expr()?)
        };
        self.eat(&TokenKind::RParen)?;

        let body = self.block()?;
        Ok(Stmt::For {
            var,
            var_ty,
            source,
            body,
            span,
        })
    }

    fn return_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.eat(&TokenKind::KwReturn)?;
        let value = if self.check(&TokenKind::SemiColon) {
            None
        } else {
            Some(self.expr()?)
        };
        self.eat(&TokenKind::SemiColon)?;
        Ok(Stmt::Return(value, span))
    }

    /// `'func' '(' (type|'void') ')' identifier '(' param (',' param)* ')' block`
    fn func_decl_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.eat(&TokenKind::KwFunc)?;
        let return_type = self.paren_type_or_void()?;
        let name = self.identifier_symbol()?;
        self.eat(&TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            params.push(self.func_param()?);
            while self.eat_if(&TokenKind::Comma)? {
                params.push(self.func_param()?);
            }
        }
        self.eat(&TokenKind::RParen)?;
        let body = self.block()?;

        Ok(Stmt::FuncDecl {
            name,
            params,
            return_type,
            body,
            span,
        })
    }

    /// `'var' '(' type ')' identifier ('=' logical_expr)?`
    fn func_param(&mut self) -> ParseResult<FuncParam> {
        let span = self.span();
        self.eat(&TokenKind::KwVar)?;
        self.eat(&TokenKind::LParen)?;
        let ty = self.var_type()?;
        self.eat(&TokenKind::RParen)?;
        let name = self.identifier_symbol()?;
        let default = if self.eat_if(&TokenKind::Assign)? {
            Some(self.expr()?)
        } else {
            None
        };
        Ok(FuncParam {
            name,
            ty,
            default,
            span,
        })
    }

    pub(crate) fn identifier_symbol(&mut self) -> ParseResult<co_util::Symbol> {
        match self.current().kind.clone() {
            TokenKind::Identifier(sym) => {
                self.advance()?;
                Ok(sym)
            }
            other => Err(self.error(format!("Expected an identifier but got \"{}\"", other))),
        }
    }
}

fn target_to_expr(target: &AssignTarget) -> Expr {
    match target {
        AssignTarget::Var(name, span) => Expr::Var(*name, *span),
        AssignTarget::Access(name, accessor, span) => Expr::Access(
            Box::new(Expr::Var(*name, *span)),
            accessor.clone(),
            *span,
        ),
    }
}

use co_util::Span;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    #[test]
    fn parses_a_var_decl_with_two_entries() {
        let mut parser = Parser::new("var(int) x = 1, y;").unwrap();
        let program = parser.parse().unwrap();
        match &program.statements[0] {
            Stmt::VarDecl { ty, declarations, .. } => {
                assert_eq!(*ty, VarType::Int);
                assert_eq!(declarations.len(), 2);
                assert!(declarations[0].init.is_some());
                assert!(declarations[1].init.is_none());
            }
            other => panic!("expected VarDecl, got {:?}", other),
        }
    }

    #[test]
    fn desugars_compound_assignment() {
        let mut parser = Parser::new("x += 1;").unwrap();
        let program = parser.parse().unwrap();
        match &program.statements[0] {
            Stmt::Assign { value, .. } => {
                assert!(matches!(value, Expr::Binary(_, BinaryOp::Add, _, _)));
            }
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn parses_if_elseif_else_back_to_back_with_no_separating_semicolons() {
        let mut parser = Parser::new(
            "if (true) { break; } elseif (false) { continue; } else { return; }",
        )
        .unwrap();
        let program = parser.parse().unwrap();
        match &program.statements[0] {
            Stmt::Conditional {
                branches,
                else_branch,
                ..
            } => {
                assert_eq!(branches.len(), 2);
                assert!(else_branch.is_some());
            }
            other => panic!("expected Conditional, got {:?}", other),
        }
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn parses_for_over_a_range_with_step() {
        let mut parser =
            Parser::new("for (var(int) i from range(0, 10, 2)) { continue; }").unwrap();
        let program = parser.parse().unwrap();
        match &program.statements[0] {
            Stmt::For {
                var_ty,
                source: ForSource::Range(Expr::Range { step, .. }),
                ..
            } => {
                assert_eq!(*var_ty, VarType::Int);
                assert!(step.is_some());
            }
            other => panic!("expected For over a Range, got {:?}", other),
        }
    }

    #[test]
    fn parses_for_over_a_string_expression() {
        let mut parser = Parser::new("for (var(str) c from s) { continue; }").unwrap();
        let program = parser.parse().unwrap();
        match &program.statements[0] {
            Stmt::For {
                source: ForSource::Expr(Expr::Var(..)),
                ..
            } => {}
            other => panic!("expected For over an expression iterable, got {:?}", other),
        }
    }

    #[test]
    fn parses_function_declaration_with_default_param() {
        let mut parser =
            Parser::new("func(int) add(var(int) a, var(int) b = 1) { return a + b; }").unwrap();
        let program = parser.parse().unwrap();
        match &program.statements[0] {
            Stmt::FuncDecl {
                params,
                return_type,
                ..
            } => {
                assert_eq!(params.len(), 2);
                assert!(params[1].default.is_some());
                assert_eq!(*return_type, Some(VarType::Int));
            }
            other => panic!("expected FuncDecl, got {:?}", other),
        }
    }

    #[test]
    fn parses_void_function_declaration() {
        let mut parser = Parser::new("func(void) greet() { return; }").unwrap();
        let program = parser.parse().unwrap();
        match &program.statements[0] {
            Stmt::FuncDecl { return_type, .. } => assert_eq!(*return_type, None),
            other => panic!("expected FuncDecl, got {:?}", other),
        }
    }
}
