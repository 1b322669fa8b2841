//! Operators of dot script.

use crate::foundations::value::Value;
use ecow::eco_format;
use std::cmp::Ordering;

pub fn add(lhs: &Value, rhs: &Value) -> Value {
    let (lhs, rhs) = (lhs.to_primitive(), rhs.to_primitive());
    match (&lhs, &rhs) {
        (Value::Str(a), b) => Value::Str(eco_format!("{a}{}", b.to_js_string())),
        (a, Value::Str(b)) => Value::Str(eco_format!("{}{b}", a.to_js_string())),
        (a, b) => Value::Number(a.to_number() + b.to_number()),
    }
}

pub fn sub(lhs: &Value, rhs: &Value) -> Value {
    Value::Number(lhs.to_number() - rhs.to_number())
}

pub fn mul(lhs: &Value, rhs: &Value) -> Value {
    Value::Number(lhs.to_number() * rhs.to_number())
}

pub fn div(lhs: &Value, rhs: &Value) -> Value {
    Value::Number(lhs.to_number() / rhs.to_number())
}

pub fn rem(lhs: &Value, rhs: &Value) -> Value {
    // `%` truncates like Rust's, so the sign follows the dividend.
    Value::Number(lhs.to_number() % rhs.to_number())
}

pub fn neg(value: &Value) -> Value {
    Value::Number(-value.to_number())
}

pub fn pos(value: &Value) -> Value {
    Value::Number(value.to_number())
}

pub fn not(value: &Value) -> Value {
    Value::Bool(!value.truthy())
}

/// `===`
pub fn strict_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
        (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
        (Value::Func(a), Value::Func(b)) => a == b,
        (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b) && a == b,
    }
}

/// `==`
pub fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (a, b) if std::mem::discriminant(a) == std::mem::discriminant(b) => strict_eq(a, b),
        (a, b) if a.is_nullish() && b.is_nullish() => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(_), Value::Str(_)) | (Value::Str(_), Value::Number(_)) => {
            lhs.to_number() == rhs.to_number()
        }
        (Value::Bool(_), other) => loose_eq(&Value::Number(lhs.to_number()), other),
        (other, Value::Bool(_)) => loose_eq(other, &Value::Number(rhs.to_number())),
        (Value::Array(_) | Value::Object(_) | Value::Func(_), _)
        | (_, Value::Array(_) | Value::Object(_) | Value::Func(_)) => {
            let (a, b) = (lhs.to_primitive(), rhs.to_primitive());
            match (&a, &b) {
                (Value::Str(_), Value::Str(_)) => a == b,
                _ => a.to_number() == b.to_number(),
            }
        }
        _ => false,
    }
}

/// Relational comparison: strings compare by code points, everything else
/// numerically. `None` when either side is `NaN`.
pub fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    let (lhs, rhs) = (lhs.to_primitive(), rhs.to_primitive());
    match (&lhs, &rhs) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (a, b) => a.to_number().partial_cmp(&b.to_number()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundations::array::Array;

    #[test]
    fn test_add_concatenates_with_strings() {
        assert_eq!(add(&Value::from(1.0), &Value::from(2.0)), Value::from(3.0));
        assert_eq!(add(&Value::from("1"), &Value::from(2.0)), Value::from("12"));
        assert!(add(&Value::from(1.0), &Value::Undefined).to_number().is_nan());
        assert_eq!(add(&Value::from(""), &Value::Undefined), Value::from("undefined"));
        let array = Value::from(vec![Value::from(1.0), Value::from(2.0)]);
        assert_eq!(add(&array, &Value::from(3.0)), Value::from("1,23"));
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_eq(&Value::Null, &Value::Undefined));
        assert!(loose_eq(&Value::from("1"), &Value::from(1.0)));
        assert!(loose_eq(&Value::from(true), &Value::from(1.0)));
        assert!(!loose_eq(&Value::Null, &Value::from(0.0)));
        assert!(!loose_eq(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    }

    #[test]
    fn test_strict_equality_uses_identity() {
        let a = Array::new();
        assert!(strict_eq(&Value::Array(a.clone()), &Value::Array(a)));
        assert!(!strict_eq(&Value::Array(Array::new()), &Value::Array(Array::new())));
        assert!(!strict_eq(&Value::from("1"), &Value::from(1.0)));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(&Value::from("a"), &Value::from("b")), Some(Ordering::Less));
        assert_eq!(compare(&Value::from("10"), &Value::from(9.0)), Some(Ordering::Greater));
        assert_eq!(compare(&Value::Undefined, &Value::from(1.0)), None);
    }
}
