//! Binary operation evaluation
//!
//! Dispatch is a flat match on the operator and then on the operand kinds.
//! Integer arithmetic is checked; any operand pairing without a rule is a
//! type error naming the operator and both operand kinds.

use std::cmp::Ordering;

use crate::ast::{BinaryOp, Expr};
use crate::{Environment, EvalError, Value};

use super::Evaluate;

/// Evaluate `left op right`.
///
/// `&&` and `||` short-circuit: the right sub-tree is only visited when the
/// left value does not already decide the result.
pub fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    match op {
        BinaryOp::And => return eval_and(left, right, offset, env),
        BinaryOp::Or => return eval_or(left, right, offset, env),
        _ => {}
    }

    // Evaluate both operands, left first
    let left = left.eval(env)?;
    let right = right.eval(env)?;

    apply_binary(op, left, right, offset)
}

/// Apply a binary operator to two already-evaluated operands.
///
/// `&&` and `||` are accepted here too and behave strictly (both operands
/// are already values).
pub fn apply_binary(
    op: BinaryOp,
    left: Value,
    right: Value,
    offset: usize,
) -> Result<Value, EvalError> {
    match op {
        // Arithmetic
        BinaryOp::Add => eval_add(left, right, offset),
        BinaryOp::Sub => eval_sub(left, right, offset),
        BinaryOp::Mul => eval_mul(left, right, offset),
        BinaryOp::Div => eval_div(left, right, offset),
        BinaryOp::Rem => eval_rem(left, right, offset),

        // Equality never fails
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),

        // Comparison
        BinaryOp::Lt => eval_lt(left, right, offset),
        BinaryOp::Le => eval_le(left, right, offset),
        BinaryOp::Gt => eval_gt(left, right, offset),
        BinaryOp::Ge => eval_ge(left, right, offset),

        // Logical
        BinaryOp::And | BinaryOp::Or => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(EvalError::type_error(op.symbol(), &[&left, &right], offset)),
        },

        // Bitwise
        BinaryOp::BitAnd => eval_bitand(left, right, offset),
        BinaryOp::BitOr => eval_bitor(left, right, offset),
        BinaryOp::BitXor => eval_bitxor(left, right, offset),
        BinaryOp::Shl => eval_shift(left, right, offset, true),
        BinaryOp::Shr => eval_shift(left, right, offset, false),

        // Membership
        BinaryOp::In => eval_in(left, right, offset),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Short-Circuit Logical Operators
// ═══════════════════════════════════════════════════════════════════════

fn eval_and(
    left: &Expr,
    right: &Expr,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    match left.eval(env)? {
        Value::Bool(false) => Ok(Value::Bool(false)), // Short-circuit
        Value::Bool(true) => match right.eval(env)? {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Err(EvalError::type_error(
                "&&",
                &[&Value::Bool(true), &other],
                offset,
            )),
        },
        other => Err(EvalError::type_error("&&", &[&other], offset)),
    }
}

fn eval_or(
    left: &Expr,
    right: &Expr,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    match left.eval(env)? {
        Value::Bool(true) => Ok(Value::Bool(true)), // Short-circuit
        Value::Bool(false) => match right.eval(env)? {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Err(EvalError::type_error(
                "||",
                &[&Value::Bool(false), &other],
                offset,
            )),
        },
        other => Err(EvalError::type_error("||", &[&other], offset)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Numeric Promotion
// ═══════════════════════════════════════════════════════════════════════

/// Two numeric operands, promoted to a common representation.
enum Numeric {
    Ints(i64, i64),
    Floats(f64, f64),
}

/// Int with Int stays Int; any Float makes both Float.
fn numeric_pair(left: &Value, right: &Value) -> Option<Numeric> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(Numeric::Ints(*a, *b)),
        (Value::Int(a), Value::Float(b)) => Some(Numeric::Floats(*a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Some(Numeric::Floats(*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Some(Numeric::Floats(*a, *b)),
        _ => None,
    }
}

fn overflow(op: &str, offset: usize) -> EvalError {
    EvalError::IntegerOverflow {
        op: op.to_string(),
        offset,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic Operations
// ═══════════════════════════════════════════════════════════════════════

macro_rules! impl_arithmetic {
    ($name:ident, $checked:ident, $op:tt, $op_str:expr) => {
        fn $name(left: Value, right: Value, offset: usize) -> Result<Value, EvalError> {
            match numeric_pair(&left, &right) {
                Some(Numeric::Ints(a, b)) => a
                    .$checked(b)
                    .map(Value::Int)
                    .ok_or_else(|| overflow($op_str, offset)),
                Some(Numeric::Floats(a, b)) => Ok(Value::Float(a $op b)),
                None => Err(EvalError::type_error($op_str, &[&left, &right], offset)),
            }
        }
    };
}

impl_arithmetic!(eval_add_numeric, checked_add, +, "+");
impl_arithmetic!(eval_sub, checked_sub, -, "-");
impl_arithmetic!(eval_mul, checked_mul, *, "*");

fn eval_add(left: Value, right: Value, offset: usize) -> Result<Value, EvalError> {
    match (&left, &right) {
        // String concatenation
        (Value::String(a), Value::String(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::from(joined))
        }

        // Numeric addition
        _ => eval_add_numeric(left, right, offset),
    }
}

macro_rules! impl_division {
    ($name:ident, $int_op:expr, $op:tt, $op_str:expr) => {
        fn $name(left: Value, right: Value, offset: usize) -> Result<Value, EvalError> {
            match numeric_pair(&left, &right) {
                Some(Numeric::Ints(_, 0)) => Err(EvalError::DivisionByZero {
                    op: $op_str.to_string(),
                    offset,
                }),
                Some(Numeric::Ints(a, b)) => ($int_op)(a, b)
                    .map(Value::Int)
                    .ok_or_else(|| overflow($op_str, offset)),
                // IEEE-754: x / 0.0 is ±inf or NaN, x % 0.0 is NaN
                Some(Numeric::Floats(a, b)) => Ok(Value::Float(a $op b)),
                None => Err(EvalError::type_error($op_str, &[&left, &right], offset)),
            }
        }
    };
}

// i64::MIN / -1 overflows; the matching remainder is exactly 0
impl_division!(eval_div, |a: i64, b: i64| a.checked_div(b), /, "/");
impl_division!(eval_rem, |a: i64, b: i64| Some(a.wrapping_rem(b)), %, "%");

// ═══════════════════════════════════════════════════════════════════════
// Comparison Operations
// ═══════════════════════════════════════════════════════════════════════

macro_rules! impl_comparison {
    ($name:ident, $op:tt, $op_str:expr) => {
        fn $name(left: Value, right: Value, offset: usize) -> Result<Value, EvalError> {
            match (&left, &right) {
                // Strings compare lexicographically
                (Value::String(a), Value::String(b)) => Ok(Value::Bool(**a $op **b)),

                // NaN is unordered, so every comparison with it is false
                _ if left.is_numeric() && right.is_numeric() => Ok(Value::Bool(
                    left.numeric_cmp(&right)
                        .map_or(false, |ord| ord $op Ordering::Equal),
                )),

                _ => Err(EvalError::type_error($op_str, &[&left, &right], offset)),
            }
        }
    };
}

impl_comparison!(eval_lt, <, "<");
impl_comparison!(eval_le, <=, "<=");
impl_comparison!(eval_gt, >, ">");
impl_comparison!(eval_ge, >=, ">=");

// ═══════════════════════════════════════════════════════════════════════
// Bitwise Operations
// ═══════════════════════════════════════════════════════════════════════

macro_rules! impl_bitwise {
    ($name:ident, $op:tt, $op_str:expr) => {
        fn $name(left: Value, right: Value, offset: usize) -> Result<Value, EvalError> {
            match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a $op b)),
                _ => Err(EvalError::type_error($op_str, &[&left, &right], offset)),
            }
        }
    };
}

impl_bitwise!(eval_bitand, &, "&");
impl_bitwise!(eval_bitor, |, "|");
impl_bitwise!(eval_bitxor, ^, "^");

/// `<<` and `>>` (arithmetic). Shift amounts outside `0..64` overflow.
fn eval_shift(left: Value, right: Value, offset: usize, is_left: bool) -> Result<Value, EvalError> {
    let op_str = if is_left { "<<" } else { ">>" };
    let (a, b) = match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => (*a, *b),
        _ => return Err(EvalError::type_error(op_str, &[&left, &right], offset)),
    };

    u32::try_from(b)
        .ok()
        .and_then(|shift| {
            if is_left {
                a.checked_shl(shift)
            } else {
                a.checked_shr(shift)
            }
        })
        .map(Value::Int)
        .ok_or_else(|| overflow(op_str, offset))
}

// ═══════════════════════════════════════════════════════════════════════
// Membership
// ═══════════════════════════════════════════════════════════════════════

/// `needle in haystack` for lists (element equality), maps (key presence)
/// and strings (substring).
fn eval_in(needle: Value, haystack: Value, offset: usize) -> Result<Value, EvalError> {
    match (&needle, &haystack) {
        (_, Value::List(items)) => Ok(Value::Bool(items.iter().any(|item| *item == needle))),
        (Value::String(key), Value::Map(map)) => Ok(Value::Bool(map.contains_key(&**key))),
        (Value::String(sub), Value::String(s)) => Ok(Value::Bool(s.contains(&**sub))),
        _ => Err(EvalError::type_error("in", &[&needle, &haystack], offset)),
    }
}
