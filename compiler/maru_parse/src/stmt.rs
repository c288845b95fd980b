//! Statement and block parsing.

use maru_ir::{Block, Stmt, TokenKind};

use crate::precedence::Precedence;
use crate::Parser;

impl Parser {
    /// Parse one statement, leaving the cursor on its last token.
    ///
    /// Returns `None` after recording a diagnostic for an unparsable
    /// statement; the caller skips it and resumes at the next token.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cursor.current_kind() {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        let position = self.cursor.current_position();

        let name = self.expect_peek_ident()?;
        if !self.expect_peek(&TokenKind::Assign) {
            return None;
        }
        self.cursor.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Some(Stmt::Let {
            name,
            value,
            position,
        })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let position = self.cursor.current_position();

        // A bare `return` before `;`, `}` or end of input carries no value.
        let value = match self.cursor.peek_kind() {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
            _ => {
                self.cursor.advance();
                Some(self.parse_expression(Precedence::Lowest)?)
            }
        };
        self.skip_optional_semicolon();

        Some(Stmt::Return { value, position })
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Some(Stmt::Expr(expression))
    }

    /// Parse a `{ ... }` block. The cursor must be on the opening brace;
    /// it ends on the closing brace (or at end of input when unclosed).
    pub(crate) fn parse_block(&mut self) -> Block {
        let position = self.cursor.current_position();
        let mut statements = Vec::new();

        self.cursor.advance();
        while !self.cursor.current_is(&TokenKind::RBrace)
            && !self.cursor.current_is(&TokenKind::Eof)
        {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.cursor.advance();
        }

        Block {
            statements,
            position,
        }
    }

    fn skip_optional_semicolon(&mut self) {
        if self.cursor.peek_is(&TokenKind::Semicolon) {
            self.cursor.advance();
        }
    }
}
