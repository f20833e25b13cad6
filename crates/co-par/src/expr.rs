//! Expression parsing.
//!
//! Precedence is encoded directly in the call structure (discrete
//! production per tier) rather than through a Pratt/binding-power table:
//! `logical_expr` calls `comparison` calls `arith` calls `term` calls
//! `factor`, each loop consuming same-tier operators left to right.

use co_lex::TokenKind;

use crate::ast::*;
use crate::{ParseResult, Parser};

impl<'a> Parser<'a> {
    pub(crate) fn expr(&mut self) -> ParseResult<Expr> {
        self.logical_expr()
    }

    fn logical_expr(&mut self) -> ParseResult<Expr> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.current().kind {
                TokenKind::KwAnd => BinaryOp::And,
                TokenKind::KwOr => BinaryOp::Or,
                _ => break,
            };
            let span = self.span();
            self.advance()?;
            let right = self.comparison()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right), span);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::KwNot) {
            let span = self.span();
            self.advance()?;
            let inner = self.comparison()?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(inner), span));
        }

        let mut left = self.arith()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            let span = self.span();
            self.advance()?;
            let right = self.arith()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right), span);
        }
        Ok(left)
    }

    fn arith(&mut self) -> ParseResult<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let span = self.span();
            self.advance()?;
            let right = self.term()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right), span);
        }
        Ok(left)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut left = self.factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::DSlash => BinaryOp::IDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            let span = self.span();
            self.advance()?;
            let right = self.factor()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right), span);
        }
        Ok(left)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let span = self.span();
        match self.current().kind.clone() {
            TokenKind::Int(v) => {
                self.advance()?;
                Ok(Expr::IntLit(v, span))
            }
            TokenKind::Float(v) => {
                self.advance()?;
                Ok(Expr::FloatLit(v, span))
            }
            TokenKind::Bool(v) => {
                self.advance()?;
                Ok(Expr::BoolLit(v, span))
            }
            TokenKind::Str(s) => {
                self.advance()?;
                let lit = Expr::StrLit(s, span);
                if self.check(&TokenKind::LBracket) {
                    let accessor = self.accessor()?;
                    Ok(Expr::Access(Box::new(lit), accessor, span))
                } else {
                    Ok(lit)
                }
            }
            TokenKind::Plus => {
                self.advance()?;
                let inner = self.factor()?;
                Ok(Expr::Unary(UnaryOp::Plus, Box::new(inner), span))
            }
            TokenKind::Minus => {
                self.advance()?;
                let inner = self.factor()?;
                Ok(Expr::Unary(UnaryOp::Minus, Box::new(inner), span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.expr()?;
                self.eat(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                if self.check(&TokenKind::LParen) {
                    let args = self.call_args()?;
                    Ok(Expr::Call(name, args, span))
                } else if self.check(&TokenKind::LBracket) {
                    let accessor = self.accessor()?;
                    Ok(Expr::Access(Box::new(Expr::Var(name, span)), accessor, span))
                } else {
                    Ok(Expr::Var(name, span))
                }
            }
            other => Err(self.error(format!("Unexpected token \"{}\" in expression", other))),
        }
    }

    /// `'range' '(' logical_expr ',' logical_expr (',' logical_expr)? ')'`
    ///
    /// Only ever called from a `for` statement's header - `range(...)` is
    /// not a general expression and cannot appear anywhere else.
    pub(crate) fn range_expr(&mut self) -> ParseResult<Expr> {
        let span = self.span();
        self.eat(&TokenKind::KwRange)?;
        self.eat(&TokenKind::LParen)?;
        let start = self.expr()?;
        self.eat(&TokenKind::Comma)?;
        let end = self.expr()?;
        let step = if self.eat_if(&TokenKind::Comma)? {
            Some(Box::new(self.expr()?))
        } else {
            None
        };
        self.eat(&TokenKind::RParen)?;
        Ok(Expr::Range {
            start: Box::new(start),
            end: Box::new(end),
            step,
            span,
        })
    }

    pub(crate) fn accessor(&mut self) -> ParseResult<Accessor> {
        self.eat(&TokenKind::LBracket)?;
        let first = self.expr()?;
        let accessor = if self.eat_if(&TokenKind::Colon)? {
            let second = self.expr()?;
            Accessor::Slice(Box::new(first), Box::new(second))
        } else {
            Accessor::Index(Box::new(first))
        };
        self.eat(&TokenKind::RBracket)?;
        Ok(accessor)
    }

    pub(crate) fn call_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.eat(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            args.push(self.expr()?);
            while self.eat_if(&TokenKind::Comma)? {
                args.push(self.expr()?);
            }
        }
        self.eat(&TokenKind::RParen)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    fn parse_expr(src: &str) -> Expr {
        let full = format!("x = {};", src);
        let mut parser = Parser::new(&full).unwrap();
        let program = parser.parse().unwrap();
        match program.statements.into_iter().next().unwrap() {
            Stmt::Assign { value, .. } => value,
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn term_binds_tighter_than_arith() {
        let expr = parse_expr("1 + 2 * 3");
        match expr {
            Expr::Binary(_, BinaryOp::Add, rhs, _) => {
                assert!(matches!(*rhs, Expr::Binary(_, BinaryOp::Mul, _, _)));
            }
            other => panic!("expected Add at the top, got {:?}", other),
        }
    }

    #[test]
    fn logical_operators_are_left_associative() {
        // (a and b) or c
        let expr = parse_expr("a and b or c");
        match expr {
            Expr::Binary(lhs, BinaryOp::Or, _, _) => {
                assert!(matches!(*lhs, Expr::Binary(_, BinaryOp::And, _, _)));
            }
            other => panic!("expected Or at the top, got {:?}", other),
        }
    }

    #[test]
    fn not_binds_a_whole_comparison() {
        let expr = parse_expr("not a == b");
        assert!(matches!(expr, Expr::Unary(UnaryOp::Not, _, _)));
    }

    #[test]
    fn parses_slice_accessor() {
        let expr = parse_expr("s[1:3]");
        match expr {
            Expr::Access(_, Accessor::Slice(_, _), _) => {}
            other => panic!("expected a slice access, got {:?}", other),
        }
    }

    #[test]
    fn parses_nested_function_call() {
        let expr = parse_expr("len(reverse(s))");
        match expr {
            Expr::Call(_, args, _) => {
                assert_eq!(args.len(), 1);
                assert!(matches!(args[0], Expr::Call(..)));
            }
            other => panic!("expected Call, got {:?}", other),
        }
    }
}
