//! The tree-walking evaluator.
//!
//! Every step that can fail produces an error value; callers check with
//! [`Value::is_error`] and short-circuit, so no failure ever unwinds the
//! host stack. Return signals travel the same way, block by block, until
//! the enclosing call unwraps them.

use std::rc::Rc;

use maru_ir::{Block, Expr, Ident, InfixOp, PrefixOp, Program, Stmt};
use tracing::trace;

use crate::builtins::Builtins;
use crate::value::{FunctionValue, HashData, HashPair};
use crate::{Env, Value};

/// The evaluator. Holds the builtin registry; all program state lives in
/// the environment chain passed through the `eval_*` calls.
pub struct Evaluator {
    builtins: Builtins,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            builtins: Builtins::new(),
        }
    }

    /// Evaluate a whole program. Returns `None` when the last statement
    /// produces no value (a `let`, or an empty program). A top-level
    /// `return` is unwrapped here, so the caller never sees the signal.
    pub fn eval_program(&self, program: &Program, env: &Env) -> Option<Value> {
        let mut result = None;
        for statement in &program.statements {
            result = self.eval_statement(statement, env);
            match &result {
                Some(Value::Return(inner)) => return Some((**inner).clone()),
                Some(value) if value.is_error() => return Some(value.clone()),
                _ => {}
            }
        }
        result
    }

    fn eval_statement(&self, statement: &Stmt, env: &Env) -> Option<Value> {
        trace!(statement = %statement, "eval_statement");
        match statement {
            Stmt::Let { name, value, .. } => {
                let value = self.eval_expression(value, env);
                if value.is_error() {
                    return Some(value);
                }
                env.set(name.name.clone(), value);
                None
            }
            Stmt::Return { value, .. } => {
                let result = match value {
                    Some(expression) => self.eval_expression(expression, env),
                    None => Value::ABSENT,
                };
                // Errors propagate as themselves, and an inner signal is
                // reused rather than wrapped again.
                if result.is_error() || matches!(result, Value::Return(_)) {
                    return Some(result);
                }
                Some(Value::Return(Rc::new(result)))
            }
            Stmt::Expr(expression) => Some(self.eval_expression(expression, env)),
        }
    }

    /// Evaluate a block, stopping at the first error or return signal and
    /// handing it to the caller undisturbed.
    fn eval_block(&self, block: &Block, env: &Env) -> Option<Value> {
        let mut result = None;
        for statement in &block.statements {
            result = self.eval_statement(statement, env);
            if matches!(result, Some(Value::Return(_)) | Some(Value::Error(_))) {
                return result;
            }
        }
        result
    }

    pub fn eval_expression(&self, expression: &Expr, env: &Env) -> Value {
        match expression {
            Expr::Ident(ident) => self.eval_identifier(ident, env),
            Expr::Int { value, .. } => Value::Int(*value),
            Expr::Str { value, .. } => Value::string(value.clone()),
            Expr::Bool { value, .. } => Value::Bool(*value),
            Expr::Prefix { op, right, position } => {
                let right = self.eval_expression(right, env);
                if right.is_error() {
                    return right;
                }
                match (op, right) {
                    (PrefixOp::Not, Value::Bool(value)) => Value::Bool(!value),
                    (PrefixOp::Neg, Value::Int(value)) => Value::Int(value.wrapping_neg()),
                    (op, right) => Value::error(
                        format!("unknown operator: {op}{}", right.kind()),
                        *position,
                    ),
                }
            }
            Expr::Infix {
                op,
                left,
                right,
                position,
            } => {
                let left_value = self.eval_expression(left, env);
                if left_value.is_error() {
                    return left_value;
                }
                let right_value = self.eval_expression(right, env);
                if right_value.is_error() {
                    return right_value;
                }
                let right_position = right.position();
                eval_infix(*op, left_value, right_value, *position, right_position)
            }
            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.eval_if(condition, consequence, alternative.as_ref(), env),
            Expr::Function {
                parameters, body, ..
            } => Value::Function(Rc::new(FunctionValue {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            })),
            Expr::Call { callee, arguments } => self.eval_call(callee, arguments, env),
            Expr::Array { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    let value = self.eval_expression(element, env);
                    if value.is_error() {
                        return value;
                    }
                    values.push(value);
                }
                Value::array(values)
            }
            Expr::Index { left, index } => self.eval_index(left, index, env),
            Expr::Hash { pairs, .. } => self.eval_hash(pairs, env),
            Expr::Property { subject, name } => self.eval_property(expression, subject, name, env),
        }
    }

    fn eval_identifier(&self, ident: &Ident, env: &Env) -> Value {
        if let Some(value) = env.get(&ident.name) {
            return value;
        }
        if let Some(builtin) = self.builtins.lookup(&ident.name) {
            return Value::Builtin(builtin);
        }
        Value::error(
            format!("identifier not found: {}", ident.name),
            ident.position,
        )
    }

    fn eval_if(
        &self,
        condition: &Expr,
        consequence: &Block,
        alternative: Option<&Block>,
        env: &Env,
    ) -> Value {
        let condition = self.eval_expression(condition, env);
        if condition.is_error() {
            return condition;
        }
        let taken = match condition {
            Value::Bool(true) => Some(consequence),
            Value::Bool(false) => alternative,
            // A non-boolean condition selects no branch.
            _ => None,
        };
        match taken {
            Some(block) => match self.eval_block(block, env) {
                Some(value) => value.wrap_maybe(),
                None => Value::ABSENT,
            },
            None => Value::ABSENT,
        }
    }

    fn eval_call(&self, callee: &Expr, arguments: &[Expr], env: &Env) -> Value {
        let position = callee.position();
        let callee_value = self.eval_expression(callee, env);
        if callee_value.is_error() {
            return callee_value;
        }

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let value = self.eval_expression(argument, env);
            if value.is_error() {
                return value;
            }
            args.push(value);
        }

        match callee_value {
            Value::Function(function) => {
                if args.len() < function.parameters.len() {
                    let missing: Vec<&str> = function.parameters[args.len()..]
                        .iter()
                        .map(|parameter| parameter.name.as_str())
                        .collect();
                    return Value::error(
                        format!(
                            "missing parameters \"{}\" in function call",
                            missing.join(", ")
                        ),
                        position,
                    );
                }
                self.apply_function(&function, &args)
            }
            Value::Builtin(builtin) => match builtin.call(&args) {
                Ok(value) => value,
                Err(message) => Value::error(message, position),
            },
            other => Value::error(format!("not a function: {}", other.kind()), position),
        }
    }

    fn apply_function(&self, function: &FunctionValue, args: &[Value]) -> Value {
        let call_env = Env::enclosed(&function.env);
        // Surplus arguments are evaluated but not bound.
        for (parameter, value) in function.parameters.iter().zip(args) {
            call_env.set(parameter.name.clone(), value.clone());
        }
        match self.eval_block(&function.body, &call_env) {
            Some(Value::Return(inner)) => (*inner).clone(),
            Some(value) => value,
            // A body whose last statement produces no value yields the
            // absent optional.
            None => Value::ABSENT,
        }
    }

    fn eval_index(&self, left: &Expr, index: &Expr, env: &Env) -> Value {
        let left_value = self.eval_expression(left, env);
        if left_value.is_error() {
            return left_value;
        }
        let index_value = self.eval_expression(index, env);
        if index_value.is_error() {
            return index_value;
        }

        match (left_value, index_value) {
            (Value::Array(elements), Value::Int(i)) => {
                let elements = elements.borrow();
                usize::try_from(i)
                    .ok()
                    .and_then(|i| elements.get(i))
                    .map_or(Value::ABSENT, |element| element.clone().wrap_maybe())
            }
            (Value::Array(_), other) => Value::error(
                format!("cannot use {} as index for array", other.kind()),
                index.position(),
            ),
            (Value::Hash(data), key) => match key.hash_key() {
                Some(hash_key) => data
                    .borrow()
                    .get(&hash_key)
                    .map_or(Value::ABSENT, |pair| pair.value.clone().wrap_maybe()),
                None => Value::error(
                    format!("cannot use index of type {} for hash", key.kind()),
                    index.position(),
                ),
            },
            (other, _) => Value::error(
                format!("cannot use index of {}", other.kind()),
                left.position(),
            ),
        }
    }

    fn eval_hash(&self, pairs: &[(Expr, Expr)], env: &Env) -> Value {
        let mut data = HashData::default();
        for (key_expression, value_expression) in pairs {
            let key = self.eval_expression(key_expression, env);
            if key.is_error() {
                return key;
            }
            let Some(hash_key) = key.hash_key() else {
                return Value::error(
                    format!("cannot use type {} as key for hash", key.kind()),
                    value_expression.position(),
                );
            };
            let value = self.eval_expression(value_expression, env);
            if value.is_error() {
                return value;
            }
            // A duplicate key keeps the later pair.
            data.insert(hash_key, HashPair { key, value });
        }
        Value::hash(data)
    }

    fn eval_property(&self, node: &Expr, subject: &Expr, name: &Ident, env: &Env) -> Value {
        let subject_value = self.eval_expression(subject, env);
        if subject_value.is_error() {
            return subject_value;
        }
        let position = node.position();

        if let Value::Maybe(inner) = &subject_value {
            match name.name.as_str() {
                "hasValue" => return Value::Bool(inner.is_some()),
                "value" => {
                    return match inner {
                        Some(value) => (**value).clone(),
                        None => Value::error(
                            format!(
                                "\"{node}\" has no value! check before with \"hasValue\"!"
                            ),
                            position,
                        ),
                    }
                }
                _ => {}
            }
        }
        Value::error(
            format!("{} has no property \"{}\".", subject_value.kind(), name.name),
            position,
        )
    }
}

/// Upper bound on the result of string repetition. Past this the operation
/// fails as a runtime error instead of exhausting host memory.
const MAX_REPEAT_BYTES: usize = 1 << 26;

fn eval_infix(
    op: InfixOp,
    left: Value,
    right: Value,
    position: maru_ir::Position,
    right_position: maru_ir::Position,
) -> Value {
    match (left, right) {
        (Value::Int(left), Value::Int(right)) => match op {
            InfixOp::Add => Value::Int(left.wrapping_add(right)),
            InfixOp::Sub => Value::Int(left.wrapping_sub(right)),
            InfixOp::Mul => Value::Int(left.wrapping_mul(right)),
            InfixOp::Div => {
                if right == 0 {
                    Value::error("division by zero", position)
                } else {
                    Value::Int(left.wrapping_div(right))
                }
            }
            InfixOp::Lt => Value::Bool(left < right),
            InfixOp::Gt => Value::Bool(left > right),
            InfixOp::Eq => Value::Bool(left == right),
            InfixOp::NotEq => Value::Bool(left != right),
        },
        (Value::Str(left), Value::Str(right)) => match op {
            InfixOp::Add => Value::string(format!("{left}{right}")),
            InfixOp::Eq => Value::Bool(left == right),
            InfixOp::NotEq => Value::Bool(left != right),
            _ => Value::error(
                format!("unknown operator: STRING {op} STRING"),
                position,
            ),
        },
        // String repetition; a non-positive count yields the empty string.
        (Value::Str(left), Value::Int(right)) if op == InfixOp::Mul => {
            let count = usize::try_from(right).unwrap_or(0);
            match left.len().checked_mul(count) {
                Some(size) if size <= MAX_REPEAT_BYTES => {
                    Value::string(left.repeat(count))
                }
                _ => Value::error("string repetition too large", position),
            }
        }
        (left, right) if left.kind() == right.kind() => match op {
            InfixOp::Eq => Value::Bool(value_eq(&left, &right)),
            InfixOp::NotEq => Value::Bool(!value_eq(&left, &right)),
            _ => Value::error(
                format!("unknown operator: {} {op} {}", left.kind(), right.kind()),
                position,
            ),
        },
        (left, right) => Value::error(
            format!(
                "type mismatch: {} {op} {}, expecting: {}",
                left.kind(),
                right.kind(),
                left.kind()
            ),
            right_position,
        ),
    }
}

/// Equality across same-kind values: scalars compare by content, compounds
/// and functions by identity, optionals recursively.
fn value_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Builtin(a), Value::Builtin(b)) => a.name() == b.name(),
        (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
        (Value::Maybe(None), Value::Maybe(None)) => true,
        (Value::Maybe(Some(a)), Value::Maybe(Some(b))) => value_eq(a, b),
        _ => false,
    }
}
