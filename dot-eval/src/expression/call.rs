use crate::{Eval, Machine};
use dot_library::Value;
use dot_library::diag::{SourceResult, bail};
use dot_library::foundations::Args;
use dot_library::foundations::methods::not_callable;
use dot_syntax::Span;
use dot_syntax::ast::{Expr, ExprKind};
use dot_utils::trace_log;

pub(super) fn call(callee: &Expr, args: &[Expr], span: Span, vm: &mut Machine) -> SourceResult<Value> {
    let func = callee.eval(vm)?;
    let values = args
        .iter()
        .map(|arg| arg.eval(vm))
        .collect::<SourceResult<Vec<_>>>()?;

    let Value::Func(func) = func else {
        bail!(not_callable(&func, &callee_name(callee), callee.span));
    };

    trace_log!("calling {:?} with {} arguments", func, values.len());
    func.call(vm, Args::new(span, values))
}

/// How a callee is referred to in error messages.
fn callee_name(callee: &Expr) -> String {
    match &callee.kind {
        ExprKind::Ident(name) => name.to_string(),
        ExprKind::Member { target, name } => format!("{}.{}", callee_name(target), name),
        ExprKind::Index { target, .. } => format!("{}[...]", callee_name(target)),
        ExprKind::Call { callee, .. } => format!("{}(...)", callee_name(callee)),
        _ => "expression".to_string(),
    }
}
