//! Builtin functions and namespaces available to every script.

use crate::diag::{SourceResult, bail};
use crate::foundations::args::Args;
use crate::foundations::func::{Func, NativeFuncData};
use crate::foundations::json::{from_json, to_json};
use crate::foundations::object::Object;
use crate::foundations::scope::Env;
use crate::foundations::value::{Value, string_to_number};
use crate::vm::Vm;
use ecow::EcoString;

macro_rules! native {
    ($($ident:ident = $name:literal => $func:expr;)*) => {
        $(
            pub static $ident: NativeFuncData = NativeFuncData {
                name: $name,
                func: $func,
            };
        )*
    };
}

native! {
    STRING = "String" => |_, args| Ok(Value::Str(match args.eat() {
        Some(value) => value.to_js_string(),
        None => EcoString::new(),
    }));
    NUMBER = "Number" => |_, args| Ok(Value::Number(args.eat().map_or(0.0, |v| v.to_number())));
    BOOLEAN = "Boolean" => |_, args| Ok(Value::Bool(args.eat_or_undefined().truthy()));
    PARSE_INT = "parseInt" => parse_int;
    PARSE_FLOAT = "parseFloat" => parse_float;
    IS_NAN = "isNaN" => |_, args| Ok(Value::Bool(args.eat_or_undefined().to_number().is_nan()));
    ENCODE_URI_COMPONENT = "encodeURIComponent" => |_, args| {
        Ok(Value::Str(encode_uri_component(&args.eat_or_undefined().to_js_string())))
    };
    JSON_STRINGIFY = "stringify" => json_stringify;
    JSON_PARSE = "parse" => json_parse;
    OBJECT_KEYS = "keys" => object_keys;
    ARRAY_IS_ARRAY = "isArray" => |_, args| Ok(Value::Bool(matches!(args.eat(), Some(Value::Array(_)))));
    MATH_FLOOR = "floor" => |_, args| Ok(math1(args, f64::floor));
    MATH_CEIL = "ceil" => |_, args| Ok(math1(args, f64::ceil));
    MATH_ROUND = "round" => |_, args| Ok(math1(args, |n| (n + 0.5).floor()));
    MATH_ABS = "abs" => |_, args| Ok(math1(args, f64::abs));
    MATH_SQRT = "sqrt" => |_, args| Ok(math1(args, f64::sqrt));
    MATH_POW = "pow" => |_, args| {
        let base = args.eat_number().unwrap_or(f64::NAN);
        let exponent = args.eat_number().unwrap_or(f64::NAN);
        Ok(Value::Number(base.powf(exponent)))
    };
    MATH_MIN = "min" => |_, args| Ok(fold(args, f64::INFINITY, f64::min));
    MATH_MAX = "max" => |_, args| Ok(fold(args, f64::NEG_INFINITY, f64::max));
}

/// Builds the global scope every script runs in.
pub fn library() -> Env {
    let global = Env::global();

    global.define("undefined", Value::Undefined);
    global.define("NaN", f64::NAN);
    global.define("Infinity", f64::INFINITY);

    for data in [
        &STRING,
        &NUMBER,
        &BOOLEAN,
        &PARSE_INT,
        &PARSE_FLOAT,
        &IS_NAN,
        &ENCODE_URI_COMPONENT,
    ] {
        global.define(data.name, Func::native(data));
    }

    global.define("JSON", namespace(&[&JSON_STRINGIFY, &JSON_PARSE]));
    global.define("Object", namespace(&[&OBJECT_KEYS]));
    global.define("Array", namespace(&[&ARRAY_IS_ARRAY]));
    global.define(
        "Math",
        namespace(&[
            &MATH_FLOOR,
            &MATH_CEIL,
            &MATH_ROUND,
            &MATH_ABS,
            &MATH_SQRT,
            &MATH_POW,
            &MATH_MIN,
            &MATH_MAX,
        ])
        .with("PI", std::f64::consts::PI),
    );

    global
}

fn namespace(funcs: &[&'static NativeFuncData]) -> Object {
    funcs
        .iter()
        .map(|data| (EcoString::from(data.name), Value::Func(Func::native(data))))
        .collect()
}

fn math1(args: &mut Args, f: impl Fn(f64) -> f64) -> Value {
    Value::Number(f(args.eat_number().unwrap_or(f64::NAN)))
}

fn fold(args: &mut Args, init: f64, f: fn(f64, f64) -> f64) -> Value {
    let mut acc = init;
    while let Some(value) = args.eat() {
        let n = value.to_number();
        if n.is_nan() {
            return Value::Number(f64::NAN);
        }
        acc = f(acc, n);
    }
    Value::Number(acc)
}

fn parse_int(_: &mut dyn Vm, args: &mut Args) -> SourceResult<Value> {
    let text = args.eat_or_undefined().to_js_string();
    let radix = args.eat_number().map_or(0, |r| r as u32);
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) if radix == 0 || radix == 16 => (16, hex),
        _ if radix == 0 => (10, digits),
        _ => (radix, digits),
    };
    if !(2..=36).contains(&radix) {
        return Ok(Value::Number(f64::NAN));
    }

    let valid: String = digits.chars().take_while(|c| c.is_digit(radix)).collect();
    if valid.is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    let magnitude = valid
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64);
    Ok(Value::Number(if negative { -magnitude } else { magnitude }))
}

fn parse_float(_: &mut dyn Vm, args: &mut Args) -> SourceResult<Value> {
    let text = args.eat_or_undefined().to_js_string();
    let text = text.trim_start();
    // The longest prefix that parses as a number.
    let end = text
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .filter(|&end| {
            let prefix = &text[..end];
            !prefix.ends_with(['e', 'E', '+', '-']) && string_to_number(prefix).is_finite()
        })
        .last();
    Ok(Value::Number(match end {
        Some(end) => string_to_number(&text[..end]),
        None if text.starts_with("Infinity") => f64::INFINITY,
        None => f64::NAN,
    }))
}

fn json_stringify(_: &mut dyn Vm, args: &mut Args) -> SourceResult<Value> {
    let value = args.eat_or_undefined();
    let _replacer = args.eat();
    let indent = match args.eat() {
        Some(Value::Number(n)) => " ".repeat(n.clamp(0.0, 10.0) as usize),
        Some(Value::Str(s)) => s.chars().take(10).collect(),
        _ => String::new(),
    };

    let Some(json) = to_json(&value) else {
        return Ok(Value::Undefined);
    };

    let text = if indent.is_empty() {
        serde_json::to_string(&json)
    } else {
        let mut buffer = vec![];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        serde::Serialize::serialize(&json, &mut serializer)
            .map(|_| String::from_utf8_lossy(&buffer).into_owned())
    };

    match text {
        Ok(text) => Ok(Value::Str(text.into())),
        Err(err) => bail!(args.span, "JSON.stringify failed: {}", err),
    }
}

fn json_parse(_: &mut dyn Vm, args: &mut Args) -> SourceResult<Value> {
    let text = args.eat_or_undefined().to_js_string();
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => Ok(from_json(&json)),
        Err(err) => bail!(args.span, "JSON.parse: {}", err),
    }
}

fn object_keys(_: &mut dyn Vm, args: &mut Args) -> SourceResult<Value> {
    Ok(match args.eat_or_undefined() {
        Value::Object(object) => {
            Value::from(object.keys().into_iter().map(Value::Str).collect::<Vec<_>>())
        }
        Value::Array(array) => Value::from((0..array.len()).map(|i| Value::Str(i.to_string().into())).collect::<Vec<_>>()),
        Value::Str(s) => Value::from((0..s.chars().count()).map(|i| Value::Str(i.to_string().into())).collect::<Vec<_>>()),
        Value::Undefined | Value::Null => bail!(args.span, "cannot convert undefined or null to object"),
        _ => Value::from(Vec::new()),
    })
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(text: &str) -> EcoString {
    let mut out = EcoString::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
