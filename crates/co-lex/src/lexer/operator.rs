//! Operator and compound-assignment lexing.
//!
//! Every arithmetic operator (`+ - * / // %`) may be followed by `=` to
//! form its compound-assignment counterpart, and `/` may additionally be
//! followed by a second `/` to select integer division before that `=`
//! check. `=` alone is ASSIGN, `==` is EQUALS; `!` is only ever the first
//! half of `!=` (Co has no standalone logical-not operator, only the
//! `not` keyword).

use co_util::LexerError;

use super::core::Lexer;
use crate::{Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn lex_operator(&mut self, start: usize) -> Result<Token, LexerError> {
        let c = self.cursor.current_char();
        self.cursor.advance();

        let kind = match c {
            '+' => self.with_optional_assign(TokenKind::Plus, TokenKind::PlusAssign),
            '-' => self.with_optional_assign(TokenKind::Minus, TokenKind::MinusAssign),
            '*' => self.with_optional_assign(TokenKind::Star, TokenKind::StarAssign),
            '%' => self.with_optional_assign(TokenKind::Percent, TokenKind::PercentAssign),
            '/' => {
                if self.cursor.current_char() == '/' {
                    self.cursor.advance();
                    self.with_optional_assign(TokenKind::DSlash, TokenKind::DSlashAssign)
                } else {
                    self.with_optional_assign(TokenKind::Slash, TokenKind::SlashAssign)
                }
            }
            '=' => {
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    TokenKind::NotEq
                } else {
                    return Err(self.error("Error occured for \"!\""));
                }
            }
            '<' => {
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            other => return Err(self.error(format!("Error occured for \"{}\"", other))),
        };

        Ok(self.make_token(kind, start))
    }

    fn with_optional_assign(&mut self, plain: TokenKind, assign: TokenKind) -> TokenKind {
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            assign
        } else {
            plain
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};

    #[test]
    fn distinguishes_assign_from_equals() {
        let mut lexer = Lexer::new("= ==");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Assign);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eq);
    }

    #[test]
    fn distinguishes_division_forms() {
        let mut lexer = Lexer::new("/ // /= //=");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Slash);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::DSlash);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::SlashAssign);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::DSlashAssign);
    }

    #[test]
    fn scans_compound_assignment_operators() {
        let mut lexer = Lexer::new("+= -= *= %=");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::PlusAssign);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::MinusAssign);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::StarAssign);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::PercentAssign);
    }

    #[test]
    fn scans_comparison_operators() {
        let mut lexer = Lexer::new("!= < <= > >=");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::NotEq);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Lt);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LtEq);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Gt);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::GtEq);
    }

    #[test]
    fn lone_bang_is_an_error() {
        let mut lexer = Lexer::new("!");
        assert!(lexer.next_token().is_err());
    }
}
