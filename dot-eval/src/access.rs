use crate::{Eval, Machine};
use dot_library::Value;
use dot_library::diag::{At, SourceResult, bail};
use dot_library::foundations::methods;
use dot_syntax::ast::{Expr, ExprKind};
use dot_syntax::Span;

/// A resolved assignment target.
///
/// The object and key of member targets are evaluated once, so compound
/// assignments like `a[i++] += 1` read and write the same slot.
pub(crate) enum Place {
    Variable(ecow::EcoString),
    Property { target: Value, key: Value },
}

impl Place {
    pub(crate) fn resolve(expr: &Expr, vm: &mut Machine) -> SourceResult<Place> {
        Ok(match &expr.kind {
            ExprKind::Ident(name) => Place::Variable(name.clone()),
            ExprKind::Member { target, name } => Place::Property {
                target: target.eval(vm)?,
                key: Value::Str(name.clone()),
            },
            ExprKind::Index { target, index } => Place::Property {
                target: target.eval(vm)?,
                key: index.eval(vm)?,
            },
            _ => bail!(expr.span, "invalid assignment target"),
        })
    }

    pub(crate) fn read(&self, vm: &Machine, span: Span) -> SourceResult<Value> {
        match self {
            Place::Variable(name) => crate::expression::read_variable(vm, name, span),
            Place::Property { target, key } => methods::get(target, key, span),
        }
    }

    pub(crate) fn write(&self, vm: &Machine, value: Value, span: Span) -> SourceResult<()> {
        match self {
            Place::Variable(name) => vm.env.assign(name, value).at(span),
            Place::Property { target, key } => methods::set(target, key, value, span),
        }
    }
}
