//! Token cursor for navigating the token stream.

use maru_ir::{Position, Token, TokenKind};

/// Two-token window over a lexed stream: the current token plus one token
/// of lookahead. Reads past the end keep yielding the trailing `Eof`.
pub(crate) struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(mut tokens: Vec<Token>) -> Self {
        // The lexer always terminates the stream; guard against callers
        // handing over a bare slice of tokens anyway.
        if !matches!(
            tokens.last().map(|token| &token.kind),
            Some(TokenKind::Eof)
        ) {
            tokens.push(Token::new(TokenKind::Eof, Position::DUMMY));
        }
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    fn at(&self, index: usize) -> &Token {
        let clamped = index.min(self.tokens.len() - 1);
        &self.tokens[clamped]
    }

    #[inline]
    pub(crate) fn current(&self) -> &Token {
        self.at(self.pos)
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    pub(crate) fn current_position(&self) -> Position {
        self.current().position
    }

    #[inline]
    pub(crate) fn peek(&self) -> &Token {
        self.at(self.pos + 1)
    }

    #[inline]
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    #[inline]
    pub(crate) fn peek_position(&self) -> Position {
        self.peek().position
    }

    #[inline]
    pub(crate) fn current_is(&self, kind: &TokenKind) -> bool {
        self.current_kind().same_kind(kind)
    }

    #[inline]
    pub(crate) fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek_kind().same_kind(kind)
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }
}
