//! Maru parser - builds an AST from a token stream.
//!
//! Recursive descent with operator-precedence (Pratt) climbing for
//! expressions: every token kind has at most one prefix rule (it can start
//! an expression) and at most one infix rule (it can continue one), and a
//! fixed ladder of binding strengths resolves precedence and associativity.
//!
//! The parser never aborts on recoverable malformed input. It records a
//! [`SyntaxError`] and carries on, yielding a possibly-incomplete
//! [`Program`] alongside the error list; callers must check the list
//! before evaluating.

mod cursor;
mod error;
mod expr;
mod precedence;
mod stmt;


use maru_ir::{Program, Token, TokenKind};
use tracing::trace;

use cursor::Cursor;
pub use error::SyntaxError;

/// Lex and parse a source string in one step.
///
/// The AST is only trustworthy when the error list is empty.
pub fn parse(source: &str) -> (Program, Vec<SyntaxError>) {
    parse_program(maru_lexer::lex(source))
}

/// Parse a full token stream into a program and a list of syntax errors.
pub fn parse_program(tokens: Vec<Token>) -> (Program, Vec<SyntaxError>) {
    let mut parser = Parser::new(tokens);
    let program = parser.run();
    (program, parser.errors)
}

/// Parse state: a cursor over the tokens plus accumulated diagnostics.
pub struct Parser {
    cursor: Cursor,
    errors: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) -> Program {
        let mut program = Program::default();
        while !self.cursor.current_is(&TokenKind::Eof) {
            trace!(token = %self.cursor.current_kind(), "parse_statement");
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.cursor.advance();
        }
        program
    }

    fn error(&mut self, message: String, position: maru_ir::Position) {
        self.errors.push(SyntaxError { message, position });
    }

    /// Advance past the peek token when it matches, otherwise record a
    /// diagnostic and stay put.
    fn expect_peek(&mut self, expected: &TokenKind) -> bool {
        if self.cursor.peek_is(expected) {
            self.cursor.advance();
            true
        } else {
            let message = format!(
                "expected next token to be '{}', got '{}' instead",
                expected,
                self.cursor.peek_kind()
            );
            let position = self.cursor.peek_position();
            self.error(message, position);
            false
        }
    }

    /// Like [`Parser::expect_peek`] for identifiers, returning the name.
    fn expect_peek_ident(&mut self) -> Option<maru_ir::Ident> {
        if let TokenKind::Ident(name) = self.cursor.peek_kind() {
            let ident = maru_ir::Ident {
                name: name.clone(),
                position: self.cursor.peek_position(),
            };
            self.cursor.advance();
            Some(ident)
        } else {
            let message = format!(
                "expected next token to be an identifier, got '{}' instead",
                self.cursor.peek_kind()
            );
            let position = self.cursor.peek_position();
            self.error(message, position);
            None
        }
    }
}
