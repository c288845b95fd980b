//! Maru IR - source positions, tokens, and AST node types.
//!
//! This crate holds the data the rest of the pipeline flows through:
//! the lexer produces [`Token`]s, the parser builds a [`Program`] of
//! [`Stmt`]/[`Expr`] nodes, and the evaluator walks that tree. Nodes are
//! built once by the parser and immutable afterwards; every node reports
//! the [`Position`] of its leading token for diagnostics.

mod ast;
mod position;
mod token;

pub use ast::{Block, Expr, Ident, InfixOp, PrefixOp, Program, Stmt};
pub use position::Position;
pub use token::{Token, TokenKind};
