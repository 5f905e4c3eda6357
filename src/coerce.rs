//! Scalar coercion toward a single declared schema type.

use serde_json::{Number, Value};

use crate::types::SchemaType;

/// Attempts to convert `value` to `target`, returning `None` when the value
/// is not convertible. Callers leave the original value in place on `None`;
/// no conversion failure escapes as an error.
///
/// Null is never convertible: nullability wins over coercion and the walker
/// short-circuits null values before calling here, so a `None` for null keeps
/// the public function consistent with that rule.
pub fn coerce_value(value: &Value, target: SchemaType) -> Option<Value> {
    match target {
        SchemaType::String => coerce_string(value),
        SchemaType::Number => coerce_number(value),
        SchemaType::Integer => coerce_integer(value),
        SchemaType::Boolean => coerce_boolean(value),
        // Structural targets pass matching shapes through and convert nothing.
        SchemaType::Object => value.is_object().then(|| value.clone()),
        SchemaType::Array => value.is_array().then(|| value.clone()),
        SchemaType::Unknown => None,
    }
}

/// Strings pass through; everything else non-null renders as its compact
/// JSON text (`[1,2,3]`, `{"a":1}`, `true`, `4.5`).
fn coerce_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        Value::Null => None,
        other => Some(Value::String(other.to_string())),
    }
}

/// Numbers widen to binary64, strings trim then parse, booleans map to
/// 1.0/0.0. Results JSON cannot represent (NaN, infinities) fail.
fn coerce_number(value: &Value) -> Option<Value> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    Number::from_f64(parsed).map(Value::Number)
}

/// Whole numbers pass through, doubles truncate toward zero when they fit
/// in i64, strings trim then parse as i64, booleans map to 1/0.
fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Some(Value::Number(u.into()))
            } else {
                let truncated = n.as_f64()?.trunc();
                if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                    Some(Value::Number(Number::from(truncated as i64)))
                } else {
                    None
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .map(|i| Value::Number(i.into())),
        Value::Bool(b) => Some(Value::Number(Number::from(i64::from(*b)))),
        _ => None,
    }
}

/// Booleans pass through, numbers map zero to false, strings map the
/// literal `"false"` and the empty string to false and anything else to
/// true. The string rule is case-sensitive.
fn coerce_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::Number(n) => Some(Value::Bool(n.as_f64() != Some(0.0))),
        Value::String(s) => Some(Value::Bool(!s.is_empty() && s != "false")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_from_scalars() {
        assert_eq!(
            coerce_value(&json!(12), SchemaType::String),
            Some(json!("12"))
        );
        assert_eq!(
            coerce_value(&json!(4.5), SchemaType::String),
            Some(json!("4.5"))
        );
        assert_eq!(
            coerce_value(&json!(true), SchemaType::String),
            Some(json!("true"))
        );
    }

    #[test]
    fn string_from_structures_is_compact_json() {
        assert_eq!(
            coerce_value(&json!([1, 2, 3]), SchemaType::String),
            Some(json!("[1,2,3]"))
        );
        assert_eq!(
            coerce_value(&json!({"1": 111}), SchemaType::String),
            Some(json!("{\"1\":111}"))
        );
    }

    #[test]
    fn string_identity_and_null() {
        assert_eq!(
            coerce_value(&json!("already"), SchemaType::String),
            Some(json!("already"))
        );
        assert_eq!(coerce_value(&json!(null), SchemaType::String), None);
    }

    #[test]
    fn number_from_string() {
        assert_eq!(
            coerce_value(&json!("2"), SchemaType::Number),
            Some(json!(2.0))
        );
        assert_eq!(
            coerce_value(&json!(" 5.5 "), SchemaType::Number),
            Some(json!(5.5))
        );
        assert_eq!(
            coerce_value(&json!("1e3"), SchemaType::Number),
            Some(json!(1000.0))
        );
        assert_eq!(coerce_value(&json!("aa12"), SchemaType::Number), None);
        assert_eq!(coerce_value(&json!(""), SchemaType::Number), None);
    }

    #[test]
    fn number_rejects_non_finite() {
        assert_eq!(coerce_value(&json!("nan"), SchemaType::Number), None);
        assert_eq!(coerce_value(&json!("inf"), SchemaType::Number), None);
        assert_eq!(coerce_value(&json!("-infinity"), SchemaType::Number), None);
    }

    #[test]
    fn number_widens_and_maps_booleans() {
        assert_eq!(
            coerce_value(&json!(12), SchemaType::Number),
            Some(json!(12.0))
        );
        assert_eq!(
            coerce_value(&json!(true), SchemaType::Number),
            Some(json!(1.0))
        );
        assert_eq!(
            coerce_value(&json!(false), SchemaType::Number),
            Some(json!(0.0))
        );
        assert_eq!(coerce_value(&json!(null), SchemaType::Number), None);
        assert_eq!(coerce_value(&json!([1]), SchemaType::Number), None);
    }

    #[test]
    fn integer_from_string() {
        assert_eq!(
            coerce_value(&json!("12"), SchemaType::Integer),
            Some(json!(12))
        );
        assert_eq!(
            coerce_value(&json!(" -7 "), SchemaType::Integer),
            Some(json!(-7))
        );
        assert_eq!(coerce_value(&json!("12.5"), SchemaType::Integer), None);
        assert_eq!(coerce_value(&json!("aa12"), SchemaType::Integer), None);
    }

    #[test]
    fn integer_truncates_toward_zero() {
        assert_eq!(
            coerce_value(&json!(4.7), SchemaType::Integer),
            Some(json!(4))
        );
        assert_eq!(
            coerce_value(&json!(-4.7), SchemaType::Integer),
            Some(json!(-4))
        );
        assert_eq!(coerce_value(&json!(1e300), SchemaType::Integer), None);
    }

    #[test]
    fn integer_whole_numbers_pass_through() {
        assert_eq!(
            coerce_value(&json!(12), SchemaType::Integer),
            Some(json!(12))
        );
        assert_eq!(
            coerce_value(&json!(u64::MAX), SchemaType::Integer),
            Some(json!(u64::MAX))
        );
        assert_eq!(
            coerce_value(&json!(true), SchemaType::Integer),
            Some(json!(1))
        );
    }

    #[test]
    fn boolean_string_literals() {
        assert_eq!(
            coerce_value(&json!("false"), SchemaType::Boolean),
            Some(json!(false))
        );
        assert_eq!(
            coerce_value(&json!(""), SchemaType::Boolean),
            Some(json!(false))
        );
        assert_eq!(
            coerce_value(&json!("true"), SchemaType::Boolean),
            Some(json!(true))
        );
        assert_eq!(
            coerce_value(&json!("False"), SchemaType::Boolean),
            Some(json!(true))
        );
        assert_eq!(
            coerce_value(&json!("anything"), SchemaType::Boolean),
            Some(json!(true))
        );
    }

    #[test]
    fn boolean_from_numbers() {
        assert_eq!(
            coerce_value(&json!(0), SchemaType::Boolean),
            Some(json!(false))
        );
        assert_eq!(
            coerce_value(&json!(0.0), SchemaType::Boolean),
            Some(json!(false))
        );
        assert_eq!(
            coerce_value(&json!(1), SchemaType::Boolean),
            Some(json!(true))
        );
        assert_eq!(
            coerce_value(&json!(-2.5), SchemaType::Boolean),
            Some(json!(true))
        );
    }

    #[test]
    fn boolean_rejects_structures_and_null() {
        assert_eq!(coerce_value(&json!(null), SchemaType::Boolean), None);
        assert_eq!(coerce_value(&json!([]), SchemaType::Boolean), None);
        assert_eq!(coerce_value(&json!({}), SchemaType::Boolean), None);
    }

    #[test]
    fn structural_targets_identity_only() {
        let obj = json!({"a": 1});
        assert_eq!(coerce_value(&obj, SchemaType::Object), Some(obj.clone()));
        assert_eq!(coerce_value(&json!("x"), SchemaType::Object), None);

        let arr = json!([1, 2]);
        assert_eq!(coerce_value(&arr, SchemaType::Array), Some(arr.clone()));
        assert_eq!(coerce_value(&json!("x"), SchemaType::Array), None);

        assert_eq!(coerce_value(&json!("x"), SchemaType::Unknown), None);
    }
}
