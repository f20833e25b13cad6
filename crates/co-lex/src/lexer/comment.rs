//! Multi-line `/* ... */` comment skipping.

use co_util::LexerError;

use super::core::Lexer;

impl<'a> Lexer<'a> {
    /// Skips a `/* ... */` comment. The cursor is already positioned on the
    /// opening `/` when this is called.
    ///
    /// Termination stops scanning as soon as the current character is `*`
    /// *or* the next character is `/`, then unconditionally advances past
    /// both closing characters. A comment with no `*/` before end of file
    /// simply runs to the end rather than erroring.
    pub(crate) fn skip_multiline_comment(&mut self) -> Result<(), LexerError> {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'

        while self.cursor.current_char() != '*' && self.cursor.peek_char(1) != '/' {
            if self.cursor.is_at_end() {
                break;
            }
            self.cursor.advance();
        }

        self.cursor.advance();
        self.cursor.advance();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Lexer;
    use crate::TokenKind;

    #[test]
    fn skips_a_single_line_comment() {
        let mut lexer = Lexer::new("/* hello */ ;");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::SemiColon);
    }

    #[test]
    fn skips_a_multi_line_comment() {
        let mut lexer = Lexer::new("/* line one\nline two */ ;");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::SemiColon);
        assert_eq!(tok.line, 2);
    }
}
