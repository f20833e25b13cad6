//! Identifier and keyword lexing.

use co_util::Symbol;

use super::core::Lexer;
use crate::{lookup_keyword, Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Scans an identifier and classifies it as a keyword, a `bool`
    /// literal (`true`/`false`), or a plain identifier.
    pub(crate) fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while !self.cursor.is_at_end()
            && (self.cursor.current_char().is_ascii_alphanumeric()
                || self.cursor.current_char() == '_')
        {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        let kind = lookup_keyword(text).unwrap_or_else(|| TokenKind::Identifier(Symbol::intern(text)));
        self.make_token(kind, start)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};

    #[test]
    fn recognizes_keywords() {
        let mut lexer = Lexer::new("while");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::KwWhile);
    }

    #[test]
    fn recognizes_bool_literals() {
        let mut lexer = Lexer::new("true false");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Bool(true));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Bool(false));
    }

    #[test]
    fn recognizes_plain_identifiers() {
        let mut lexer = Lexer::new("total_count");
        match lexer.next_token().unwrap().kind {
            TokenKind::Identifier(sym) => assert_eq!(sym.as_str(), "total_count"),
            other => panic!("expected Identifier, got {:?}", other),
        }
    }
}
