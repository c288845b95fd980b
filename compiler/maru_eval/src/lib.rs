//! Maru evaluator - walks the AST and produces runtime values.
//!
//! Failures are values, not host panics: every fallible step yields a
//! positioned [`Value::Error`] that short-circuits outward, and `return`
//! travels as a [`Value::Return`] signal until a call frame unwraps it.
//! `if` expressions and container lookups produce optionals
//! ([`Value::Maybe`]) instead of a null.

mod builtins;
mod env;
mod eval;
mod value;

#[cfg(test)]
mod tests;

pub use builtins::Builtin;
pub use env::Env;
pub use eval::Evaluator;
pub use value::{ErrorValue, FunctionValue, HashData, HashKey, HashPair, Value};
