//! Built-in functions.
//!
//! Builtins work on already-evaluated arguments and report failures as
//! plain messages; the evaluator attaches the call position and turns them
//! into error values.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::Value;

pub type BuiltinFn = fn(&[Value]) -> Result<Value, String>;

/// A named host function exposed to Maru programs.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    run: BuiltinFn,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.run)(args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// The builtin registry. Lookups happen only after environment lookups
/// fail, so a `let length = ...` binding shadows the builtin.
pub(crate) struct Builtins {
    table: FxHashMap<&'static str, Builtin>,
}

impl Builtins {
    pub(crate) fn new() -> Self {
        let mut table = FxHashMap::default();
        for (name, run) in [
            ("length", length as BuiltinFn),
            ("push", push),
            ("first", first),
            ("last", last),
        ] {
            table.insert(name, Builtin { name, run });
        }
        Builtins { table }
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Builtin> {
        self.table.get(name).copied()
    }
}

fn expect_arity(args: &[Value], want: usize) -> Result<(), String> {
    if args.len() == want {
        Ok(())
    } else {
        Err(format!(
            "wrong number of arguments. got={}, want={want}",
            args.len()
        ))
    }
}

fn length(args: &[Value]) -> Result<Value, String> {
    expect_arity(args, 1)?;
    match &args[0] {
        Value::Str(value) => Ok(Value::Int(saturating_len(value.len()))),
        Value::Array(elements) => Ok(Value::Int(saturating_len(elements.borrow().len()))),
        other => Err(format!(
            "argument to `length` not supported. got={}",
            other.kind()
        )),
    }
}

fn push(args: &[Value]) -> Result<Value, String> {
    expect_arity(args, 2)?;
    match &args[0] {
        Value::Array(elements) => {
            elements.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
        other => Err(format!(
            "argument to `push` not supported. got={}",
            other.kind()
        )),
    }
}

fn first(args: &[Value]) -> Result<Value, String> {
    expect_arity(args, 1)?;
    match &args[0] {
        Value::Array(elements) => Ok(elements
            .borrow()
            .first()
            .map_or(Value::ABSENT, |element| element.clone().wrap_maybe())),
        other => Err(format!(
            "argument to `first` not supported. got={}",
            other.kind()
        )),
    }
}

fn last(args: &[Value]) -> Result<Value, String> {
    expect_arity(args, 1)?;
    match &args[0] {
        Value::Array(elements) => Ok(elements
            .borrow()
            .last()
            .map_or(Value::ABSENT, |element| element.clone().wrap_maybe())),
        other => Err(format!(
            "argument to `last` not supported. got={}",
            other.kind()
        )),
    }
}

fn saturating_len(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
