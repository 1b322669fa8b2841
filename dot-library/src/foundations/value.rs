use crate::foundations::array::Array;
use crate::foundations::func::Func;
use crate::foundations::object::Object;
use ecow::{EcoString, eco_format};
use std::fmt;
use std::fmt::{Debug, Formatter};

/// A runtime value of dot script.
///
/// Arrays and objects are shared handles: cloning a value clones the handle,
/// not the contents.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(EcoString),
    Array(Array),
    Object(Object),
    Func(Func),
}

impl Value {
    pub fn str(text: impl Into<EcoString>) -> Self {
        Value::Str(text.into())
    }

    /// The result of `typeof value`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Func(_) => "function",
        }
    }

    /// A short name of the value's kind for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::Str(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
            Value::Func(_) => "a function",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Func(_) => true,
        }
    }

    /// Converts the value to a string the way string concatenation does.
    pub fn to_js_string(&self) -> EcoString {
        match self {
            Value::Undefined => "undefined".into(),
            Value::Null => "null".into(),
            Value::Bool(b) => if *b { "true" } else { "false" }.into(),
            Value::Number(n) => number_to_string(*n),
            Value::Str(s) => s.clone(),
            Value::Array(array) => array.join(","),
            Value::Object(_) => "[object Object]".into(),
            Value::Func(func) => eco_format!("function {}() {{ [code] }}", func.name().unwrap_or("")),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::Func(_) => f64::NAN,
        }
    }

    /// Arrays and objects convert to strings, everything else is kept.
    pub fn to_primitive(&self) -> Value {
        match self {
            Value::Array(_) | Value::Object(_) | Value::Func(_) => Value::Str(self.to_js_string()),
            other => other.clone(),
        }
    }
}

/// Formats a number like script code would print it.
pub fn number_to_string(n: f64) -> EcoString {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if n == 0.0 {
        return "0".into();
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        // `1e21` becomes `1e+21`.
        let formatted = format!("{n:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => eco_format!("{mantissa}e+{exp}"),
            _ => formatted.into(),
        };
    }

    eco_format!("{n}")
}

pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts spellings like `inf` and `NaN` that scripts do not.
        t if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        t => t.parse().unwrap_or(f64::NAN),
    }
}

impl PartialEq for Value {
    /// Structural equality, used by tests and `includes`-like lookups on
    /// primitives. Script level `===` lives in [`ops::strict_eq`](crate::foundations::ops::strict_eq).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.ptr_eq(b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => {
                a.ptr_eq(b) || *a.borrow() == *b.borrow()
            }
            (Value::Func(a), Value::Func(b)) => a == b,
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.pad("undefined"),
            Value::Null => f.pad("null"),
            Value::Bool(b) => Debug::fmt(b, f),
            Value::Number(n) => f.pad(&number_to_string(*n)),
            Value::Str(s) => Debug::fmt(s, f),
            Value::Array(array) => Debug::fmt(array, f),
            Value::Object(object) => Debug::fmt(object, f),
            Value::Func(func) => Debug::fmt(func, f),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.into())
    }
}

impl From<EcoString> for Value {
    fn from(value: EcoString) -> Self {
        Value::Str(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<Func> for Value {
    fn from(value: Func) -> Self {
        Value::Func(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(value))
    }
}
