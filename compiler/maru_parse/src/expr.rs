//! Expression parsing (Pratt).

use maru_ir::{Expr, InfixOp, PrefixOp, TokenKind};
use tracing::trace;

use crate::precedence::Precedence;
use crate::Parser;

impl Parser {
    /// Parse an expression with the given minimum binding strength.
    ///
    /// Runs the current token's prefix rule, then folds infix rules into
    /// the accumulated left-hand side while the next token binds tighter
    /// than `min`. The fold stops at statement terminators and block
    /// delimiters regardless of precedence.
    pub(crate) fn parse_expression(&mut self, min: Precedence) -> Option<Expr> {
        trace!(token = %self.cursor.current_kind(), ?min, "parse_expression");

        let mut left = self.parse_prefix()?;

        while !self.cursor.peek_is(&TokenKind::Semicolon)
            && !self.cursor.peek_is(&TokenKind::LBrace)
            && !self.cursor.peek_is(&TokenKind::RBrace)
            && min < Precedence::of(self.cursor.peek_kind())
        {
            self.cursor.advance();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    /// Dispatch the prefix rule for the current token.
    fn parse_prefix(&mut self) -> Option<Expr> {
        let position = self.cursor.current_position();
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => Some(Expr::Ident(maru_ir::Ident {
                name: name.clone(),
                position,
            })),
            TokenKind::Int(literal) => match literal.parse::<i64>() {
                Ok(value) => Some(Expr::Int { value, position }),
                Err(_) => {
                    let message = format!("could not parse \"{literal}\" as integer");
                    self.error(message, position);
                    None
                }
            },
            TokenKind::Str(value) => Some(Expr::Str {
                value: value.clone(),
                position,
            }),
            TokenKind::True => Some(Expr::Bool {
                value: true,
                position,
            }),
            TokenKind::False => Some(Expr::Bool {
                value: false,
                position,
            }),
            TokenKind::Bang => self.parse_prefix_operator(PrefixOp::Not),
            TokenKind::Minus => self.parse_prefix_operator(PrefixOp::Neg),
            TokenKind::LParen => self.parse_grouped(),
            TokenKind::If => self.parse_if(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            other => {
                let message = format!("no prefix parse rule for '{other}'");
                self.error(message, position);
                None
            }
        }
    }

    /// Dispatch the infix rule for the current token, folding `left`.
    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        let op = match self.cursor.current_kind() {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::Gt => InfixOp::Gt,
            TokenKind::Eq => InfixOp::Eq,
            TokenKind::NotEq => InfixOp::NotEq,
            TokenKind::LParen => return self.parse_call(left),
            TokenKind::LBracket => return self.parse_index(left),
            TokenKind::Dot => return self.parse_property(left),
            // Unreachable: the expression loop only advances onto tokens
            // with an infix binding strength.
            other => {
                let message = format!("no infix parse rule for '{other}'");
                let position = self.cursor.current_position();
                self.error(message, position);
                return None;
            }
        };

        let position = self.cursor.current_position();
        let precedence = Precedence::of(self.cursor.current_kind());
        self.cursor.advance();
        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
            position,
        })
    }

    fn parse_prefix_operator(&mut self, op: PrefixOp) -> Option<Expr> {
        let position = self.cursor.current_position();
        self.cursor.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix {
            op,
            right: Box::new(right),
            position,
        })
    }

    fn parse_grouped(&mut self) -> Option<Expr> {
        self.cursor.advance();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&TokenKind::RParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_if(&mut self) -> Option<Expr> {
        let position = self.cursor.current_position();

        self.cursor.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block();

        let alternative = if self.cursor.peek_is(&TokenKind::Else) {
            self.cursor.advance();
            if !self.expect_peek(&TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };

        Some(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
            position,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let position = self.cursor.current_position();

        if !self.expect_peek(&TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(&TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();

        Some(Expr::Function {
            parameters,
            body,
            position,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<maru_ir::Ident>> {
        if self.cursor.peek_is(&TokenKind::RParen) {
            self.cursor.advance();
            return Some(Vec::new());
        }

        let mut parameters = vec![self.expect_peek_ident()?];
        while self.cursor.peek_is(&TokenKind::Comma) {
            self.cursor.advance();
            parameters.push(self.expect_peek_ident()?);
        }

        if !self.expect_peek(&TokenKind::RParen) {
            return None;
        }
        Some(parameters)
    }

    fn parse_call(&mut self, callee: Expr) -> Option<Expr> {
        let arguments = self.parse_expression_list(&TokenKind::RParen)?;
        Some(Expr::Call {
            callee: Box::new(callee),
            arguments,
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let position = self.cursor.current_position();
        let elements = self.parse_expression_list(&TokenKind::RBracket)?;
        Some(Expr::Array { elements, position })
    }

    /// Comma-separated expressions up to (and consuming) `end`.
    fn parse_expression_list(&mut self, end: &TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.cursor.peek_is(end) {
            self.cursor.advance();
            return Some(list);
        }

        self.cursor.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.cursor.peek_is(&TokenKind::Comma) {
            self.cursor.advance();
            self.cursor.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_index(&mut self, left: Expr) -> Option<Expr> {
        self.cursor.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&TokenKind::RBracket) {
            return None;
        }
        Some(Expr::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_property(&mut self, subject: Expr) -> Option<Expr> {
        let name = self.expect_peek_ident()?;
        Some(Expr::Property {
            subject: Box::new(subject),
            name,
        })
    }

    /// `{ key: value, ... }` - empty allowed, trailing comma tolerated.
    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let position = self.cursor.current_position();
        let mut pairs = Vec::new();

        while !self.cursor.peek_is(&TokenKind::RBrace) {
            self.cursor.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(&TokenKind::Colon) {
                return None;
            }
            self.cursor.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.cursor.peek_is(&TokenKind::RBrace)
                && !self.expect_peek(&TokenKind::Comma)
            {
                return None;
            }
        }

        if !self.expect_peek(&TokenKind::RBrace) {
            return None;
        }
        Some(Expr::Hash { pairs, position })
    }
}
