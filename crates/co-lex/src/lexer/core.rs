//! Main `Lexer` struct and token dispatch.

use co_util::LexerError;

use crate::cursor::Cursor;
use crate::{Token, TokenKind};

/// Scans Co source text into a stream of [`Token`]s.
///
/// Call [`Lexer::next_token`] repeatedly until it returns a token whose
/// `kind` is [`TokenKind::Eof`]. Any lexical problem - an unrecognized
/// character, an unterminated string, a malformed number - aborts the
/// scan with a [`LexerError`]; Co's lexer never recovers and resumes.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) token_start_line: u32,
    pub(crate) token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Scans and returns the next token, advancing past it.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments()?;

        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();
        let start = self.cursor.position();

        if self.cursor.is_at_end() {
            return Ok(self.make_token(TokenKind::Eof, start));
        }

        let c = self.cursor.current_char();

        if c == '"' {
            return self.lex_string();
        }
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.lex_identifier_or_keyword(start));
        }
        if c.is_ascii_digit() {
            return self.lex_number(start);
        }
        if matches!(c, '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>') {
            return self.lex_operator(start);
        }

        match c {
            ';' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::SemiColon, start))
            }
            ':' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::Colon, start))
            }
            ',' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::Comma, start))
            }
            '(' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::LParen, start))
            }
            ')' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::RParen, start))
            }
            '{' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::LBrace, start))
            }
            '}' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::RBrace, start))
            }
            '[' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::LBracket, start))
            }
            ']' => {
                self.cursor.advance();
                Ok(self.make_token(TokenKind::RBracket, start))
            }
            other => Err(self.error(format!("Error occured for \"{}\"", other))),
        }
    }

    /// Builds a `Token` whose lexeme is the source slice from `start` to
    /// the cursor's current position, tagged with the token's start
    /// position (not the cursor's current position).
    pub(crate) fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        let lexeme = self.cursor.slice_from(start).to_string();
        Token::new(kind, lexeme, self.token_start_line, self.token_start_column)
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> LexerError {
        LexerError {
            message: message.into(),
            line: self.cursor.line(),
            column: self.cursor.column(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexerError> {
        loop {
            while !self.cursor.is_at_end() && self.cursor.current_char().is_whitespace() {
                self.cursor.advance();
            }

            if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '*' {
                self.skip_multiline_comment()?;
                continue;
            }

            break;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_eof_for_empty_source() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn skips_leading_and_trailing_whitespace() {
        let mut lexer = Lexer::new("   ;   ");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::SemiColon);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn reports_unrecognized_character() {
        let mut lexer = Lexer::new("?");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 1);
    }

    // ------------------------------------------------------------------
    // Property-based tests - arbitrary inputs drawn from the grammar's
    // own character classes rather than hand-picked examples.
    // ------------------------------------------------------------------

    #[test]
    fn property_every_source_eventually_reaches_eof() {
        use proptest::prelude::*;

        proptest!(|(input in "[a-zA-Z0-9_+\\-*/%=!<>(){}\\[\\];:, \n\t]{0,200}")| {
            let mut lexer = Lexer::new(&input);
            let mut steps = 0;
            loop {
                steps += 1;
                prop_assert!(steps <= input.len() + 2, "lexer did not reach EOF within a bounded number of tokens");
                match lexer.next_token() {
                    Ok(tok) if tok.kind == TokenKind::Eof => break,
                    Ok(_) => continue,
                    Err(_) => break,
                }
            }
        });
    }

    #[test]
    fn property_token_positions_never_go_backwards() {
        use proptest::prelude::*;

        proptest!(|(input in "[a-zA-Z0-9_ \n\t;(){}]{0,100}")| {
            let mut lexer = Lexer::new(&input);
            let mut last = (1u32, 1u32);
            loop {
                let tok = match lexer.next_token() {
                    Ok(tok) => tok,
                    Err(_) => break,
                };
                let pos = (tok.line, tok.column);
                prop_assert!(pos >= last);
                last = pos;
                if tok.kind == TokenKind::Eof {
                    break;
                }
            }
        });
    }

    #[test]
    fn property_arbitrary_identifier_is_a_single_token() {
        use proptest::prelude::*;

        proptest!(|(input in "[a-zA-Z_][a-zA-Z0-9_]{0,40}")| {
            let mut lexer = Lexer::new(&input);
            let first = lexer.next_token().unwrap();
            prop_assert!(matches!(first.kind, TokenKind::Identifier(_)) || crate::lookup_keyword(&input).is_some());
            prop_assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        });
    }
}
