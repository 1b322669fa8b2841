use crate::{Eval, Machine};
use dot_error_codes::E0005_UNDEFINED_VARIABLE;
use dot_library::Value;
use dot_library::diag::{SourceResult, bail, error};
use dot_library::foundations::methods;
use dot_syntax::Span;
use dot_syntax::ast::{Expr, ExprKind};

mod atomic;
mod binary;
mod call;

impl Eval for &Expr {
    type Output = Value;

    fn eval(self, vm: &mut Machine) -> SourceResult<Value> {
        let span = self.span;
        match &self.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Template(parts) => atomic::template(parts, vm),
            ExprKind::Ident(name) => read_variable(vm, name, span),
            ExprKind::Array(items) => atomic::array(items, vm),
            ExprKind::Object(entries) => atomic::object(entries, vm),
            ExprKind::Member { target, name } => {
                let target = target.as_ref().eval(vm)?;
                methods::get_named(&target, name, span)
            }
            ExprKind::Index { target, index } => {
                let target = target.as_ref().eval(vm)?;
                let key = index.as_ref().eval(vm)?;
                methods::get(&target, &key, span)
            }
            ExprKind::Call { callee, args } => call::call(callee, args, span, vm),
            ExprKind::Func(def) => Ok(atomic::closure(def, vm)),
            ExprKind::Unary { op, expr } => binary::unary(*op, expr, vm),
            ExprKind::Update {
                op,
                prefix,
                target,
            } => binary::update(*op, *prefix, target, span, vm),
            ExprKind::Binary { op, lhs, rhs } => binary::binary(*op, lhs, rhs, vm),
            ExprKind::Conditional {
                test,
                then,
                otherwise,
            } => {
                if test.as_ref().eval(vm)?.truthy() {
                    then.as_ref().eval(vm)
                } else {
                    otherwise.as_ref().eval(vm)
                }
            }
            ExprKind::Assign { op, target, value } => binary::assign(*op, target, value, span, vm),
        }
    }
}

/// Reads a variable, failing when it was never declared.
pub(crate) fn read_variable(vm: &Machine, name: &str, span: Span) -> SourceResult<Value> {
    match vm.env.lookup(name) {
        Some(value) => Ok(value),
        None => bail!(
            error!(span, "`{}` is not defined", name)
                .with_code(&E0005_UNDEFINED_VARIABLE)
                .with_hint("declare it with `let`, `var` or `const`, or pass it in the data")
        ),
    }
}
