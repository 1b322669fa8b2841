use crate::{Eval, Machine};
use dot_library::Value;
use dot_library::diag::SourceResult;
use dot_library::foundations::{Array, Func, Object};
use dot_syntax::ast::{Expr, FuncDef, TemplatePart};
use ecow::EcoString;
use std::sync::Arc;

pub(super) fn template(parts: &[TemplatePart], vm: &mut Machine) -> SourceResult<Value> {
    let mut out = EcoString::new();
    for part in parts {
        match part {
            TemplatePart::Text(text) => out.push_str(text),
            TemplatePart::Expr(expr) => out.push_str(&expr.eval(vm)?.to_js_string()),
        }
    }
    Ok(Value::Str(out))
}

pub(super) fn array(items: &[Expr], vm: &mut Machine) -> SourceResult<Value> {
    let values = items
        .iter()
        .map(|item| item.eval(vm))
        .collect::<SourceResult<Vec<_>>>()?;
    Ok(Value::Array(Array::from_vec(values)))
}

pub(super) fn object(entries: &[(EcoString, Expr)], vm: &mut Machine) -> SourceResult<Value> {
    let object = Object::new();
    for (key, value) in entries {
        object.insert(key.clone(), value.eval(vm)?);
    }
    Ok(Value::Object(object))
}

pub(super) fn closure(def: &Arc<FuncDef>, vm: &Machine) -> Value {
    Value::Func(Func::closure(def.clone(), vm.env.clone()))
}
