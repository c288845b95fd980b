//! Maru lexer - turns source text into a position-tagged token stream.
//!
//! A simple linear byte scan with one character of lookahead and no
//! backtracking. Maru source is ASCII apart from string literal contents,
//! which are taken verbatim between the quotes (no escape processing).
//! Columns count bytes from the start of the line, 1-based.

use maru_ir::{Position, Token, TokenKind};

/// Pull-based tokenizer over a source string.
///
/// [`Lexer::next_token`] produces one token per call and an endless tail of
/// [`TokenKind::Eof`] once the input is exhausted. [`lex`] collects the whole
/// stream including the single trailing `Eof`.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    read_pos: usize,
    ch: u8,
    line: u32,
    column: u32,
}

/// Tokenize an entire source string.
///
/// The returned stream always ends with exactly one `Eof` token.
pub fn lex(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input,
            pos: 0,
            read_pos: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let position = Position::new(self.line, self.column);
        let kind = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b':' => TokenKind::Colon,
            b'.' => TokenKind::Dot,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'"' => TokenKind::Str(self.read_string()),
            0 => TokenKind::Eof,
            ch if is_letter(ch) => {
                let ident = self.read_identifier();
                let kind =
                    TokenKind::keyword(&ident).unwrap_or(TokenKind::Ident(ident));
                // read_identifier leaves the cursor on the first
                // non-identifier byte; do not advance again.
                return Token::new(kind, position);
            }
            ch if ch.is_ascii_digit() => {
                let literal = self.read_number();
                return Token::new(TokenKind::Int(literal), position);
            }
            ch => TokenKind::Illegal(ch as char),
        };

        self.read_char();
        Token::new(kind, position)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            if self.ch == b'\n' {
                self.line += 1;
                self.column = 0;
            }
            self.read_char();
        }
    }

    /// Read the contents of a string literal, leaving the cursor on the
    /// closing quote (or at end of input for an unterminated literal).
    fn read_string(&mut self) -> String {
        let start = self.pos + 1;
        loop {
            self.read_char();
            if self.ch == b'"' || self.ch == 0 {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while is_letter(self.ch) {
            self.read_char();
        }
        self.input[start..self.pos].to_string()
    }

    fn read_number(&mut self) -> String {
        let start = self.pos;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        self.input[start..self.pos].to_string()
    }

    fn read_char(&mut self) {
        self.ch = self
            .input
            .as_bytes()
            .get(self.read_pos)
            .copied()
            .unwrap_or(0);
        self.pos = self.read_pos;
        self.read_pos += 1;
        self.column += 1;
    }

    fn peek_char(&self) -> u8 {
        self.input
            .as_bytes()
            .get(self.read_pos)
            .copied()
            .unwrap_or(0)
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}
