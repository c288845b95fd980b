//! Runtime values.
//!
//! Values are cheap to clone: compounds hang off `Rc`, so binding a value,
//! passing it as an argument, or storing it in a container shares the same
//! allocation. Arrays and hashes are additionally wrapped in `RefCell`
//! because builtins mutate them in place through any alias.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use maru_ir::{Block, Ident, Position};
use rustc_hash::FxHashMap;

use crate::builtins::Builtin;
use crate::Env;

/// A user-defined function together with its captured environment.
pub struct FunctionValue {
    pub parameters: Vec<Ident>,
    pub body: Block,
    pub env: Env,
}

/// The keyable subset of values. `Rc<str>` hashes like `str`, so string
/// keys compare by content, not by allocation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum HashKey {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
}

/// One hash entry: the original key value is kept alongside the payload so
/// `inspect` can render the pair as written.
#[derive(Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

pub type HashData = FxHashMap<HashKey, HashPair>;

/// Errors are ordinary values: an evaluation step that fails produces one,
/// and every consumer checks for it and short-circuits.
pub struct ErrorValue {
    pub message: String,
    pub position: Position,
}

/// A Maru runtime value.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    Hash(Rc<RefCell<HashData>>),
    Function(Rc<FunctionValue>),
    Builtin(Builtin),
    Error(Rc<ErrorValue>),
    /// An in-flight `return`: unwinds through enclosing blocks until the
    /// surrounding function call (or the program) unwraps it. Never nested.
    Return(Rc<Value>),
    /// An optional: `Some` holds a present value, `None` is the absent
    /// optional. The payload is never itself a `Maybe`.
    Maybe(Option<Rc<Value>>),
}

impl Value {
    /// The absent optional.
    pub const ABSENT: Value = Value::Maybe(None);

    pub fn string(value: impl Into<String>) -> Value {
        Value::Str(Rc::from(value.into()))
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn hash(data: HashData) -> Value {
        Value::Hash(Rc::new(RefCell::new(data)))
    }

    pub fn error(message: impl Into<String>, position: Position) -> Value {
        Value::Error(Rc::new(ErrorValue {
            message: message.into(),
            position,
        }))
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Lift a value into a present optional. Errors and return signals pass
    /// through untouched, and an optional stays as it is, so optionals
    /// never nest.
    pub fn wrap_maybe(self) -> Value {
        match self {
            Value::Error(_) | Value::Return(_) | Value::Maybe(_) => self,
            present => Value::Maybe(Some(Rc::new(present))),
        }
    }

    /// The value's type name as shown in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "INTEGER",
            Value::Bool(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Error(_) => "ERROR",
            Value::Return(_) => "RETURN_VALUE",
            Value::Maybe(_) => "MAYBE",
        }
    }

    /// The hash key for this value, or `None` if the type is not keyable.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Int(value) => Some(HashKey::Int(*value)),
            Value::Bool(value) => Some(HashKey::Bool(*value)),
            Value::Str(value) => Some(HashKey::Str(Rc::clone(value))),
            _ => None,
        }
    }

    /// Render the value the way the REPL prints it.
    ///
    /// Containers can be made self-referential through `push`, so nesting
    /// is rendered to a fixed depth and cut off with `...` past it.
    pub fn inspect(&self) -> String {
        self.inspect_at(0)
    }

    fn inspect_at(&self, depth: usize) -> String {
        const MAX_DEPTH: usize = 32;
        if depth > MAX_DEPTH {
            return "...".to_string();
        }
        match self {
            Value::Int(value) => value.to_string(),
            Value::Bool(value) => value.to_string(),
            Value::Str(value) => format!("\"{value}\""),
            Value::Array(elements) => {
                let rendered: Vec<String> = elements
                    .borrow()
                    .iter()
                    .map(|element| element.inspect_at(depth + 1))
                    .collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(data) => {
                let rendered: Vec<String> = data
                    .borrow()
                    .values()
                    .map(|pair| {
                        format!(
                            "{}: {}",
                            pair.key.inspect_at(depth + 1),
                            pair.value.inspect_at(depth + 1)
                        )
                    })
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(function) => {
                let parameters: Vec<&str> = function
                    .parameters
                    .iter()
                    .map(|parameter| parameter.name.as_str())
                    .collect();
                format!("fn({}) {}", parameters.join(", "), function.body)
            }
            Value::Builtin(builtin) => format!("builtin function {}", builtin.name()),
            Value::Error(error) => {
                format!("Error at position {} - {}", error.position, error.message)
            }
            Value::Return(inner) => inner.inspect_at(depth + 1),
            Value::Maybe(Some(inner)) => format!("maybe({})", inner.inspect_at(depth + 1)),
            Value::Maybe(None) => "maybe([no value])".to_string(),
        }
    }
}

// Functions capture their defining environment, which may transitively
// contain the function itself; Debug goes through `inspect`, which renders
// the body without touching the environment.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}
