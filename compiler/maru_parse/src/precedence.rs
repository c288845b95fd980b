//! Binding strengths for Pratt parsing.

use maru_ir::TokenKind;

/// Operator binding strength, lowest to highest.
///
/// The derived `Ord` gives the ladder its total order, so
/// `a + b * c` binds `b * c` first and `1 < 2 == true` parses as
/// `((1 < 2) == true)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) enum Precedence {
    Lowest,
    /// `==` `!=`
    Equality,
    /// `<` `>`
    Relational,
    /// `+` `-`
    Additive,
    /// `*` `/`
    Multiplicative,
    /// unary `!` `-`
    Prefix,
    /// `(`
    Call,
    /// `[` and `.`
    Index,
}

impl Precedence {
    /// The infix binding strength of a token kind; `Lowest` for tokens
    /// with no infix rule.
    pub(crate) fn of(kind: &TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equality,
            TokenKind::Lt | TokenKind::Gt => Precedence::Relational,
            TokenKind::Plus | TokenKind::Minus => Precedence::Additive,
            TokenKind::Star | TokenKind::Slash => Precedence::Multiplicative,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket | TokenKind::Dot => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}
