//! co-par - the recursive-descent parser for Co
//!
//! Builds an [`ast::Program`] from a token stream pulled on demand from a
//! [`co_lex::Lexer`]. There is no lookahead beyond the current token
//! ("predictive" / LL(1) parsing): every production is chosen by the
//! current token's kind alone, in the style of the grammar below.
//!
//! ```ebnf
//! statement    := func_decl | var_decl ';' | for | while | conditional
//!               | func_call ';' | assignment ';' | ';'
//! var_decl     := 'var' '(' type ')' decl_item (',' decl_item)*
//! decl_item    := IDENTIFIER ('=' logical_expr)?
//! func_decl    := 'func' '(' (type | 'void') ')' IDENTIFIER
//!                 '(' param (',' param)* ')' '{' statement* '}'
//! param        := 'var' '(' type ')' IDENTIFIER ('=' logical_expr)?
//! for          := 'for' '(' 'var' '(' type ')' IDENTIFIER 'from'
//!                 (range_expr | logical_expr) ')' '{' statement* '}'
//! range_expr   := 'range' '(' logical_expr ',' logical_expr
//!                 (',' logical_expr)? ')'
//! while        := 'while' '(' logical_expr ')' '{' statement* '}'
//! conditional  := 'if' '(' logical_expr ')' block
//!                 ('elseif' '(' logical_expr ')' block)*
//!                 ('else' block)?
//! logical_expr := comparison (('and' | 'or') comparison)*
//! comparison   := 'not' comparison | arith (relop arith)*
//! arith        := term (('+' | '-') term)*
//! term         := factor (('*' | '/' | '//' | '%') factor)*
//! factor       := INT | FLOAT | BOOL | STR
//!               | '(' logical_expr ')'
//!               | ('+' | '-') factor
//!               | IDENTIFIER ('(' args ')' | '[' logical_expr (':' logical_expr)? ']')?
//! ```
//!
//! `range_expr` is special: it is only reachable from a `for` header, never
//! as a general expression. `;` is not a blanket statement separator -
//! only `var_decl`, `assignment` and a bare call append one, since every
//! other statement kind is self-delimited by its trailing `}`.
//!
//! Compound assignment (`x += e`) is desugared here, at parse time, into
//! a plain assignment of a `BinaryOp` (`x = x + e`) - the same rewrite
//! the grammar's `assignment` production describes.

pub mod ast;
mod expr;
mod stmt;

use co_lex::{Lexer, Token, TokenKind};
use co_util::{CoError, ParserError, Span};

use ast::Program;

pub type ParseResult<T> = Result<T, CoError>;

/// Recursive-descent parser over a Co source string.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parses an entire program: a statement list terminated by EOF.
    pub fn parse(&mut self) -> ParseResult<Program> {
        let statements = self.statement_list()?;
        self.expect_eof()?;
        Ok(Program { statements })
    }

    pub(crate) fn current(&self) -> &Token {
        &self.current
    }

    pub(crate) fn span(&self) -> Span {
        Span::point(self.current.line, self.current.column)
    }

    /// Consumes and returns the current token, pulling the next one from
    /// the lexer.
    pub(crate) fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consumes the current token if its kind matches `kind`'s
    /// discriminant (payload values, e.g. the exact `Int` value, are
    /// ignored), otherwise raises a parser error.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind) {
            self.advance()
        } else {
            Err(self.error(format!(
                "Expected \"{}\" but got \"{}\"",
                kind, self.current.kind
            )))
        }
    }

    /// Consumes the current token if it matches `kind`, returning whether
    /// it did, without raising an error when it does not.
    pub(crate) fn eat_if(&mut self, kind: &TokenKind) -> ParseResult<bool> {
        if std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn expect_eof(&mut self) -> ParseResult<()> {
        if self.check(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.error(format!("Unexpected token \"{}\"", self.current.kind)))
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> CoError {
        CoError::Parser(ParserError {
            message: message.into(),
            line: self.current.line,
            column: self.current.column,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_empty_program() {
        let mut parser = Parser::new("").unwrap();
        let program = parser.parse().unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn a_lone_semicolon_is_an_empty_statement() {
        let mut parser = Parser::new(";").unwrap();
        let program = parser.parse().unwrap();
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], ast::Stmt::Empty(_)));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let mut parser = Parser::new("var(int) x; )").unwrap();
        assert!(parser.parse().is_err());
    }
}
