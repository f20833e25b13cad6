//! Integer and floating-point literal lexing.

use co_util::LexerError;

use super::core::Lexer;
use crate::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Scans a run of digits, optionally followed by `.` and more digits.
    /// Produces `Int` when there is no fractional part, `Float` otherwise.
    pub(crate) fn lex_number(&mut self, start: usize) -> Result<Token, LexerError> {
        while !self.cursor.is_at_end() && self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;
        if self.cursor.current_char() == '.' {
            is_float = true;
            self.cursor.advance();
            while !self.cursor.is_at_end() && self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(start);
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid float literal \"{}\"", text)))?;
            Ok(self.make_token(TokenKind::Float(value), start))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid int literal \"{}\"", text)))?;
            Ok(self.make_token(TokenKind::Int(value), start))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};

    #[test]
    fn scans_an_integer() {
        let mut lexer = Lexer::new("42");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Int(42));
    }

    #[test]
    fn scans_a_float() {
        let mut lexer = Lexer::new("3.14");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Float(3.14));
    }

    #[test]
    fn a_trailing_dot_with_no_following_digit_still_yields_a_float() {
        let mut lexer = Lexer::new("5.");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Float(5.0));
    }
}
