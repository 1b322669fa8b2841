//! Property access and the builtin methods of strings, arrays, numbers and
//! objects.

use crate::diag::{At, SourceResult, StrResult, bail, error};
use crate::foundations::args::Args;
use crate::foundations::array::Array;
use crate::foundations::func::Func;
use crate::foundations::ops::strict_eq;
use crate::foundations::value::{Value, number_to_string};
use crate::vm::Vm;
use dot_error_codes::{E0006_NOT_CALLABLE, E0007_PROPERTY_OF_NOTHING};
use dot_syntax::Span;
use ecow::{EcoString, eco_format};

const STR_METHODS: &[&str] = &[
    "toUpperCase",
    "toLowerCase",
    "trim",
    "indexOf",
    "includes",
    "slice",
    "substring",
    "split",
    "replace",
    "charAt",
    "startsWith",
    "endsWith",
    "repeat",
    "toString",
];

const ARRAY_METHODS: &[&str] = &[
    "push", "pop", "join", "indexOf", "includes", "slice", "concat", "map", "filter", "forEach",
    "reverse", "toString",
];

const NUMBER_METHODS: &[&str] = &["toFixed", "toString"];

/// Reads `target[key]`.
pub fn get(target: &Value, key: &Value, span: Span) -> SourceResult<Value> {
    match (target, array_index(key)) {
        (Value::Array(array), Some(index)) => Ok(array.get(index)),
        (Value::Str(s), Some(index)) => Ok(s
            .chars()
            .nth(index)
            .map_or(Value::Undefined, |c| Value::Str(c.into()))),
        _ => get_named(target, &key.to_js_string(), span),
    }
}

/// Reads `target.name`.
pub fn get_named(target: &Value, name: &str, span: Span) -> SourceResult<Value> {
    let builtin = |methods: &[&str]| {
        if methods.contains(&name) {
            Value::Func(Func::method(target.clone(), name))
        } else {
            Value::Undefined
        }
    };

    Ok(match target {
        Value::Undefined | Value::Null => {
            return Err(ecow::eco_vec![
                error!(span, "cannot read property `{}` of {}", name, target.describe())
                    .with_code(&E0007_PROPERTY_OF_NOTHING)
                    .with_hint("check that the data passed to the template has this field")
            ]);
        }
        Value::Str(s) if name == "length" => Value::from(s.chars().count()),
        Value::Str(_) => builtin(STR_METHODS),
        Value::Array(array) if name == "length" => Value::from(array.len()),
        Value::Array(_) => builtin(ARRAY_METHODS),
        Value::Number(_) => builtin(NUMBER_METHODS),
        Value::Bool(_) => builtin(&["toString"]),
        Value::Object(object) => match object.get(name) {
            Some(value) => value,
            None => builtin(&["toString", "hasOwnProperty"]),
        },
        Value::Func(_) => Value::Undefined,
    })
}

/// Performs `target[key] = value`.
pub fn set(target: &Value, key: &Value, value: Value, span: Span) -> SourceResult<()> {
    match target {
        Value::Undefined | Value::Null => {
            return Err(ecow::eco_vec![
                error!(
                    span,
                    "cannot set property `{}` of {}",
                    key.to_js_string(),
                    target.describe()
                )
                .with_code(&E0007_PROPERTY_OF_NOTHING)
            ]);
        }
        Value::Array(array) => {
            if let Some(index) = array_index(key) {
                array.set(index, value);
            } else if key.to_js_string() == "length" {
                let len = value.to_number();
                if len < 0.0 || len.fract() != 0.0 {
                    bail!(span, "invalid array length {}", number_to_string(len));
                }
                array.borrow_mut().resize(len as usize, Value::Undefined);
            }
        }
        Value::Object(object) => object.insert(key.to_js_string(), value),
        // Writes to properties of primitives are silently dropped.
        _ => {}
    }
    Ok(())
}

/// Interprets a property key as an array index.
fn array_index(key: &Value) -> Option<usize> {
    match key {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n < usize::MAX as f64 => {
            Some(*n as usize)
        }
        Value::Str(s) => {
            let index: usize = s.parse().ok()?;
            (index.to_string() == s.as_str()).then_some(index)
        }
        _ => None,
    }
}

/// Calls the builtin method `name` on `this`.
pub fn call_method(vm: &mut dyn Vm, this: &Value, name: &str, mut args: Args) -> SourceResult<Value> {
    let span = args.span;
    match this {
        Value::Str(s) => str_method(s, name, &mut args, vm),
        Value::Array(array) => array_method(vm, array, name, &mut args),
        Value::Number(n) => match name {
            "toFixed" => {
                let digits = args.eat_number().unwrap_or(0.0);
                if !(0.0..=100.0).contains(&digits) {
                    bail!(span, "toFixed() digits argument must be between 0 and 100");
                }
                Ok(Value::Str(eco_format!("{:.*}", digits as usize, n)))
            }
            _ => Ok(Value::Str(number_to_string(*n))),
        },
        Value::Object(object) if name == "hasOwnProperty" => {
            let key = args.eat_or_undefined().to_js_string();
            Ok(Value::Bool(object.contains(&key)))
        }
        other => Ok(Value::Str(other.to_js_string())),
    }
}

/// Resolves a possibly negative relative index against `len`.
fn relative(index: Option<f64>, len: usize, default: usize) -> usize {
    match index {
        None => default,
        Some(i) if i.is_nan() => 0,
        Some(i) if i < 0.0 => (len as f64 + i.trunc()).max(0.0) as usize,
        Some(i) => (i.trunc() as usize).min(len),
    }
}

fn str_method(s: &EcoString, name: &str, args: &mut Args, vm: &mut dyn Vm) -> SourceResult<Value> {
    let span = args.span;
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let substr = |start: usize, end: usize| -> Value {
        Value::Str(chars[start..end.max(start)].iter().copied().collect())
    };

    Ok(match name {
        "toUpperCase" => Value::Str(s.to_uppercase().into()),
        "toLowerCase" => Value::Str(s.to_lowercase().into()),
        "trim" => Value::Str(s.trim().into()),
        "indexOf" => {
            let needle = args.eat_or_undefined().to_js_string();
            let from = relative(args.eat_number(), len, 0).min(len);
            let haystack: String = chars[from..].iter().collect();
            match haystack.find(needle.as_str()) {
                Some(byte) => Value::from(from + haystack[..byte].chars().count()),
                None => Value::Number(-1.0),
            }
        }
        "includes" => {
            let needle = args.eat_or_undefined().to_js_string();
            Value::Bool(s.contains(needle.as_str()))
        }
        "slice" => {
            let start = relative(args.eat_number(), len, 0);
            let end = relative(args.eat_number(), len, len);
            substr(start, end)
        }
        "substring" => {
            let clamp = |n: Option<f64>, default: usize| match n {
                None => default,
                Some(n) if n.is_nan() || n < 0.0 => 0,
                Some(n) => (n as usize).min(len),
            };
            let start = clamp(args.eat_number(), 0);
            let end = clamp(args.eat_number(), len);
            substr(start.min(end), start.max(end))
        }
        "split" => {
            let parts: Vec<Value> = match args.eat() {
                None | Some(Value::Undefined) => vec![Value::Str(s.clone())],
                Some(separator) => {
                    let separator = separator.to_js_string();
                    if separator.is_empty() {
                        chars.iter().map(|c| Value::Str((*c).into())).collect()
                    } else {
                        s.split(separator.as_str()).map(Value::from).collect()
                    }
                }
            };
            let limit = args.eat_number().map_or(usize::MAX, |n| n.max(0.0) as usize);
            Value::from(parts.into_iter().take(limit).collect::<Vec<_>>())
        }
        "replace" => {
            let pattern = args.eat_or_undefined().to_js_string();
            let replacement = args.eat_or_undefined();
            match s.find(pattern.as_str()) {
                None => Value::Str(s.clone()),
                Some(at) => {
                    let with = match replacement {
                        Value::Func(func) => func
                            .call(vm, Args::new(span, [Value::Str(pattern.clone())]))?
                            .to_js_string(),
                        other => other.to_js_string(),
                    };
                    Value::Str(eco_format!(
                        "{}{}{}",
                        &s[..at],
                        with,
                        &s[at + pattern.len()..]
                    ))
                }
            }
        }
        "charAt" => {
            let index = args.eat_number().unwrap_or(0.0);
            if index < 0.0 || index.fract() != 0.0 || index as usize >= len {
                Value::str("")
            } else {
                Value::Str(chars[index as usize].into())
            }
        }
        "startsWith" => {
            let prefix = args.eat_or_undefined().to_js_string();
            Value::Bool(s.starts_with(prefix.as_str()))
        }
        "endsWith" => {
            let suffix = args.eat_or_undefined().to_js_string();
            Value::Bool(s.ends_with(suffix.as_str()))
        }
        "repeat" => {
            let count = args.eat_number().unwrap_or(0.0);
            if count < 0.0 || count.is_infinite() {
                bail!(span, "invalid count value: {}", number_to_string(count));
            }
            Value::Str(s.repeat(count as usize).into())
        }
        _ => Value::Str(s.clone()),
    })
}

fn array_method(vm: &mut dyn Vm, array: &Array, name: &str, args: &mut Args) -> SourceResult<Value> {
    let span = args.span;
    Ok(match name {
        "push" => {
            while let Some(value) = args.eat() {
                array.push(value);
            }
            Value::from(array.len())
        }
        "pop" => array.borrow_mut().pop().unwrap_or_default(),
        "join" => {
            let separator = match args.eat() {
                None | Some(Value::Undefined) => EcoString::from(","),
                Some(value) => value.to_js_string(),
            };
            Value::Str(array.join(&separator))
        }
        "indexOf" => {
            let needle = args.eat_or_undefined();
            array
                .snapshot()
                .iter()
                .position(|value| strict_eq(value, &needle))
                .map_or(Value::Number(-1.0), Value::from)
        }
        "includes" => {
            let needle = args.eat_or_undefined();
            let is_nan = |v: &Value| matches!(v, Value::Number(n) if n.is_nan());
            Value::Bool(
                array
                    .snapshot()
                    .iter()
                    .any(|value| strict_eq(value, &needle) || (is_nan(value) && is_nan(&needle))),
            )
        }
        "slice" => {
            let items = array.snapshot();
            let start = relative(args.eat_number(), items.len(), 0);
            let end = relative(args.eat_number(), items.len(), items.len());
            Value::from(items[start..end.max(start)].to_vec())
        }
        "concat" => {
            let mut items = array.snapshot();
            while let Some(value) = args.eat() {
                match value {
                    Value::Array(other) => items.extend(other.snapshot()),
                    other => items.push(other),
                }
            }
            Value::from(items)
        }
        "map" | "filter" | "forEach" => {
            let callback = callable(args.eat_or_undefined()).at(span)?;
            let mut out = vec![];
            for (index, item) in array.snapshot().into_iter().enumerate() {
                let call_args = Args::new(
                    span,
                    [item.clone(), Value::from(index), Value::Array(array.clone())],
                );
                let result = callback.call(vm, call_args)?;
                match name {
                    "map" => out.push(result),
                    "filter" if result.truthy() => out.push(item),
                    _ => {}
                }
            }
            match name {
                "forEach" => Value::Undefined,
                _ => Value::from(out),
            }
        }
        "reverse" => {
            array.borrow_mut().reverse();
            Value::Array(array.clone())
        }
        _ => Value::Str(array.join(",")),
    })
}

fn callable(value: Value) -> StrResult<Func> {
    match value {
        Value::Func(func) => Ok(func),
        other => Err(eco_format!("{} is not a function", other.describe())),
    }
}

/// The error for calling something that is not a function.
pub fn not_callable(value: &Value, what: &str, span: Span) -> crate::diag::SourceDiagnostic {
    error!(span, "`{}` is not a function, it is {}", what, value.describe())
        .with_code(&E0006_NOT_CALLABLE)
}
