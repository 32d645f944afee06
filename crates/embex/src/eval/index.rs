//! Index and slice expression evaluation

use crate::ast::Expr;
use crate::{Environment, EvalError, Value};

use super::Evaluate;

/// Evaluate an index expression.
///
/// Supports indexing into List and String by Int, and Map by String.
///
/// # Errors
///
/// Returns `IndexOutOfRange` if a list or string index is negative or past
/// the end. Returns `TypeError` for any other pairing of base and index.
/// A missing map key is not an error and yields `nil`.
pub fn eval_index(
    target: &Expr,
    index: &Expr,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    let base = target.eval(env)?;
    let key = index.eval(env)?;
    index_value(&base, &key, offset)
}

/// Index an evaluated value.
pub fn index_value(base: &Value, key: &Value, offset: usize) -> Result<Value, EvalError> {
    match (base, key) {
        // List indexing
        (Value::List(items), Value::Int(i)) => {
            let idx = position(*i, items.len(), offset)?;
            Ok(items[idx].clone())
        }

        // String indexing (returns a one-character string)
        (Value::String(s), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|idx| s.chars().nth(idx))
            .map(|c| Value::from(c.to_string()))
            .ok_or_else(|| EvalError::IndexOutOfRange {
                index: *i,
                len: s.chars().count(),
                offset,
            }),

        // Map indexing
        (Value::Map(map), Value::String(k)) => Ok(map.get(&**k).cloned().unwrap_or(Value::Nil)),

        _ => Err(EvalError::type_error("[]", &[base, key], offset)),
    }
}

/// Check `index` against `len`. Negative indices are out of range.
fn position(index: i64, len: usize, offset: usize) -> Result<usize, EvalError> {
    usize::try_from(index)
        .ok()
        .filter(|&idx| idx < len)
        .ok_or(EvalError::IndexOutOfRange { index, len, offset })
}

/// Evaluate `target[start:end]` on a List or String.
///
/// Bounds default to `0` and the length. They must satisfy
/// `0 <= start <= end <= len`; strings are sliced by character.
pub fn eval_slice(
    target: &Expr,
    start: Option<&Expr>,
    end: Option<&Expr>,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    let base = target.eval(env)?;
    let start = start.map(|e| e.eval(env)).transpose()?;
    let end = end.map(|e| e.eval(env)).transpose()?;

    let len = match &base {
        Value::List(items) => items.len(),
        Value::String(s) => s.chars().count(),
        _ => return Err(EvalError::type_error("[:]", &[&base], offset)),
    };

    let lo = slice_bound(&base, start.as_ref(), 0, len, offset)?;
    let hi = slice_bound(&base, end.as_ref(), len, len, offset)?;
    if lo > hi {
        return Err(EvalError::IndexOutOfRange {
            index: lo as i64,
            len,
            offset,
        });
    }

    match &base {
        Value::List(items) => Ok(Value::list(items[lo..hi].to_vec())),
        Value::String(s) => Ok(Value::from(
            s.chars().skip(lo).take(hi - lo).collect::<String>(),
        )),
        _ => Err(EvalError::type_error("[:]", &[&base], offset)),
    }
}

fn slice_bound(
    base: &Value,
    bound: Option<&Value>,
    default: usize,
    len: usize,
    offset: usize,
) -> Result<usize, EvalError> {
    match bound {
        None => Ok(default),
        Some(Value::Int(i)) => usize::try_from(*i)
            .ok()
            .filter(|&idx| idx <= len)
            .ok_or(EvalError::IndexOutOfRange {
                index: *i,
                len,
                offset,
            }),
        Some(other) => Err(EvalError::type_error("[:]", &[base, other], offset)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::eval_in;
    use super::*;
    use crate::{Functions, Variables};

    fn eval_with_list(src: &str) -> Result<Value, EvalError> {
        let mut vars = Variables::new();
        vars.insert(
            "a".to_string(),
            Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        );
        vars.insert("s".to_string(), Value::string("héllo"));
        eval_in(src, &vars, &Functions::new())
    }

    #[test]
    fn test_list_index() {
        assert_eq!(eval_with_list("a[0]").unwrap(), Value::Int(1));
        assert_eq!(eval_with_list("a[1 + 1]").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_list_index_out_of_range() {
        assert!(matches!(
            eval_with_list("a[3]"),
            Err(EvalError::IndexOutOfRange {
                index: 3,
                len: 3,
                offset: 1
            })
        ));
    }

    #[test]
    fn test_list_negative_index_out_of_range() {
        assert!(matches!(
            eval_with_list("a[-1]"),
            Err(EvalError::IndexOutOfRange { index: -1, .. })
        ));
    }

    #[test]
    fn test_list_index_wrong_type() {
        assert!(matches!(
            eval_with_list(r#"a["0"]"#),
            Err(EvalError::TypeError { .. })
        ));
        assert!(matches!(
            eval_with_list("a[0.0]"),
            Err(EvalError::TypeError { .. })
        ));
        assert!(matches!(
            eval_with_list("1[0]"),
            Err(EvalError::TypeError { .. })
        ));
    }

    #[test]
    fn test_string_index_is_char_based() {
        assert_eq!(eval_with_list("s[1]").unwrap(), Value::string("é"));
        assert!(matches!(
            eval_with_list("s[5]"),
            Err(EvalError::IndexOutOfRange { len: 5, .. })
        ));
    }

    #[test]
    fn test_map_index() {
        assert_eq!(eval_with_list(r#"{a: 1}["a"]"#).unwrap(), Value::Int(1));
        assert_eq!(eval_with_list(r#"{a: 1}["b"]"#).unwrap(), Value::Nil);
        assert!(matches!(
            eval_with_list("{a: 1}[0]"),
            Err(EvalError::TypeError { .. })
        ));
    }

    #[test]
    fn test_slices() {
        assert_eq!(
            eval_with_list("a[1:]").unwrap(),
            Value::list(vec![Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            eval_with_list("a[:1]").unwrap(),
            Value::list(vec![Value::Int(1)])
        );
        assert_eq!(eval_with_list("a[2:2]").unwrap(), Value::list(vec![]));
        assert_eq!(eval_with_list("s[1:3]").unwrap(), Value::string("él"));
        assert_eq!(eval_with_list("s[:]").unwrap(), Value::string("héllo"));
    }

    #[test]
    fn test_slice_errors() {
        assert!(matches!(
            eval_with_list("a[2:1]"),
            Err(EvalError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            eval_with_list("a[0:4]"),
            Err(EvalError::IndexOutOfRange { index: 4, .. })
        ));
        assert!(matches!(
            eval_with_list("a[-1:]"),
            Err(EvalError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            eval_with_list(r#"a["x":]"#),
            Err(EvalError::TypeError { .. })
        ));
        assert!(matches!(
            eval_with_list("{a: 1}[0:1]"),
            Err(EvalError::TypeError { .. })
        ));
    }
}
