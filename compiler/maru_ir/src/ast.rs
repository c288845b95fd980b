//! AST node types for Maru.
//!
//! Statements and expressions are closed enums so the evaluator can match
//! exhaustively. The tree is uniquely owned from [`Program`] down; nothing
//! is shared and nothing is mutated after parsing.
//!
//! `Display` renders the canonical re-serialization of a node. For the
//! grammar subset without hash literals, re-parsing the rendered text yields
//! a program that evaluates to the same value.

use std::fmt;

use crate::Position;

/// Prefix (unary) operators.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PrefixOp {
    /// `!` - boolean negation
    Not,
    /// `-` - integer negation
    Neg,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Not => write!(f, "!"),
            PrefixOp::Neg => write!(f, "-"),
        }
    }
}

/// Infix (binary) operators.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfixOp::Add => write!(f, "+"),
            InfixOp::Sub => write!(f, "-"),
            InfixOp::Mul => write!(f, "*"),
            InfixOp::Div => write!(f, "/"),
            InfixOp::Lt => write!(f, "<"),
            InfixOp::Gt => write!(f, ">"),
            InfixOp::Eq => write!(f, "=="),
            InfixOp::NotEq => write!(f, "!="),
        }
    }
}

/// An identifier with its source position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ident {
    pub name: String,
    pub position: Position,
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A brace-delimited sequence of statements.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub position: Position,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        write!(f, " }}")
    }
}

/// Expressions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Int {
        value: i64,
        position: Position,
    },
    Str {
        value: String,
        position: Position,
    },
    Bool {
        value: bool,
        position: Position,
    },
    Prefix {
        op: PrefixOp,
        right: Box<Expr>,
        position: Position,
    },
    /// `position` is the operator token; diagnostics about the operation
    /// itself point there, while operand diagnostics point at the operands.
    Infix {
        op: InfixOp,
        left: Box<Expr>,
        right: Box<Expr>,
        position: Position,
    },
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
        position: Position,
    },
    Function {
        parameters: Vec<Ident>,
        body: Block,
        position: Position,
    },
    /// Reports the callee's position, not the `(` token.
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Array {
        elements: Vec<Expr>,
        position: Position,
    },
    /// Reports the left operand's position, not the `[` token.
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
    /// Pairs are kept in source order.
    Hash {
        pairs: Vec<(Expr, Expr)>,
        position: Position,
    },
    /// Reports the subject's position, not the `.` token.
    Property {
        subject: Box<Expr>,
        name: Ident,
    },
}

impl Expr {
    /// The position of the node's leading token. Call, index, and property
    /// expressions report their callee/left/subject position.
    pub fn position(&self) -> Position {
        match self {
            Expr::Ident(ident) => ident.position,
            Expr::Int { position, .. }
            | Expr::Str { position, .. }
            | Expr::Bool { position, .. }
            | Expr::Prefix { position, .. }
            | Expr::Infix { position, .. }
            | Expr::If { position, .. }
            | Expr::Function { position, .. }
            | Expr::Array { position, .. }
            | Expr::Hash { position, .. } => *position,
            Expr::Call { callee, .. } => callee.position(),
            Expr::Index { left, .. } => left.position(),
            Expr::Property { subject, .. } => subject.position(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(ident) => write!(f, "{ident}"),
            Expr::Int { value, .. } => write!(f, "{value}"),
            Expr::Str { value, .. } => write!(f, "\"{value}\""),
            Expr::Bool { value, .. } => write!(f, "{value}"),
            Expr::Prefix { op, right, .. } => write!(f, "({op}{right})"),
            Expr::Infix {
                op, left, right, ..
            } => write!(f, "({left} {op} {right})"),
            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Expr::Function {
                parameters, body, ..
            } => {
                write!(f, "fn(")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") {body}")
            }
            Expr::Call { callee, arguments } => {
                write!(f, "{callee}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
            Expr::Array { elements, .. } => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
            Expr::Index { left, index } => write!(f, "({left}[{index}])"),
            Expr::Hash { pairs, .. } => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Expr::Property { subject, name } => write!(f, "{subject}.{name}"),
        }
    }
}

/// Statements.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stmt {
    Let {
        name: Ident,
        value: Expr,
        position: Position,
    },
    Return {
        value: Option<Expr>,
        position: Position,
    },
    Expr(Expr),
}

impl Stmt {
    /// The position of the statement's leading token.
    pub fn position(&self) -> Position {
        match self {
            Stmt::Let { position, .. } | Stmt::Return { position, .. } => *position,
            Stmt::Expr(expr) => expr.position(),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value, .. } => write!(f, "let {name} = {value};"),
            Stmt::Return { value: Some(value), .. } => write!(f, "return {value};"),
            Stmt::Return { value: None, .. } => write!(f, "return;"),
            Stmt::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

/// A parsed program: the root of the AST.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    /// The position of the first statement, or [`Position::DUMMY`] when empty.
    pub fn position(&self) -> Position {
        self.statements
            .first()
            .map_or(Position::DUMMY, Stmt::position)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
