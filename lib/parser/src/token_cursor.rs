use scanner::{Token, TokenKind};

use crate::{ParserError, ParserErrorType};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("token stream is empty")]
    OutOfBounds,
    #[error("token stream does not end with an end-of-file token")]
    MissingEndMarker,
}

/// Position into a borrowed, end-marker-terminated token buffer.
///
/// The buffer is validated once in [`TokenCursor::new`], so [`TokenCursor::peek`]
/// is always defined afterwards. The position never moves past the first
/// [`TokenKind::Eof`].
#[derive(Debug, Clone)]
pub struct TokenCursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    current: usize,
}

impl<'t, 'a> TokenCursor<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Result<Self, CursorError> {
        match tokens.last() {
            None => Err(CursorError::OutOfBounds),
            Some(last) if last.kind != TokenKind::Eof => Err(CursorError::MissingEndMarker),
            Some(_) => Ok(Self { tokens, current: 0 }),
        }
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn peek(&self) -> &'t Token<'a> {
        &self.tokens[self.current]
    }

    /// The token just behind the current position, `None` before the first advance.
    pub fn previous(&self) -> Option<&'t Token<'a>> {
        self.current.checked_sub(1).map(|i| &self.tokens[i])
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Returns the current token and steps over it. Stays put on `Eof`.
    pub fn advance(&mut self) -> &'t Token<'a> {
        let token = self.peek();
        if !self.is_at_end() {
            log::trace!("consumed {:?} '{}' at {}", token.kind, token.lexeme, token.position());
            self.current += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consumes and returns the current token if it has one of `kinds`.
    pub fn match_token(&mut self, kinds: &[TokenKind]) -> Option<&'t Token<'a>> {
        if kinds.iter().any(|&kind| self.check(kind)) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        self.match_token(kinds).is_some()
    }

    /// Consumes a token of `kind`, or reports `error` at the current token without moving.
    pub fn consume(
        &mut self,
        kind: TokenKind,
        error: ParserErrorType,
    ) -> Result<&'t Token<'a>, ParserError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParserError::new(error, self.peek()))
        }
    }
}
