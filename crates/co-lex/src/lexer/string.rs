//! String literal lexing.

use co_util::{LexerError, Symbol};

use super::core::Lexer;
use crate::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Scans a double-quoted string literal, interpreting `\n` `\t` `\r`
    /// `\0` escapes and passing any other escaped character through
    /// literally (so `\"` and `\\` work as expected).
    ///
    /// An unterminated string (end of file reached before the closing
    /// `"`) is a lexer error.
    pub(crate) fn lex_string(&mut self) -> Result<Token, LexerError> {
        let start = self.cursor.position();
        self.cursor.advance(); // opening quote

        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error("Unterminated string literal"));
            }

            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    if self.cursor.is_at_end() {
                        return Err(self.error("Unterminated string literal"));
                    }
                    let escaped = self.cursor.current_char();
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                    self.cursor.advance();
                }
                c => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }

        Ok(self.make_token(TokenKind::Str(Symbol::intern(&value)), start))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};

    #[test]
    fn scans_a_plain_string() {
        let mut lexer = Lexer::new("\"hello\"");
        match lexer.next_token().unwrap().kind {
            TokenKind::Str(sym) => assert_eq!(sym.as_str(), "hello"),
            other => panic!("expected Str, got {:?}", other),
        }
    }

    #[test]
    fn interprets_escape_sequences() {
        let mut lexer = Lexer::new("\"a\\nb\"");
        match lexer.next_token().unwrap().kind {
            TokenKind::Str(sym) => assert_eq!(sym.as_str(), "a\nb"),
            other => panic!("expected Str, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut lexer = Lexer::new("\"abc");
        assert!(lexer.next_token().is_err());
    }
}
