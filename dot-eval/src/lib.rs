//! Evaluates dot script programs.

mod access;
mod expression;
mod hoist;
mod statement;
mod vm;

#[cfg(test)]
mod test;

pub use crate::vm::{FlowEvent, Machine};

use dot_library::diag::{SourceResult, syntax_errors};
use dot_library::foundations::Env;
use dot_library::{Value, library};
use dot_syntax::ast::Program;
use dot_syntax::{FileId, ast};
use dot_utils::trace_fn;
use ecow::EcoString;

pub trait Eval {
    type Output;

    fn eval(self, vm: &mut Machine) -> SourceResult<Self::Output>;
}

/// Runs `program` as the body of a function whose parameters are `bindings`.
///
/// Returns the value of the first `return` that is reached, or `undefined`.
pub fn eval_program(
    program: &Program,
    bindings: impl IntoIterator<Item = (EcoString, Value)>,
) -> SourceResult<Value> {
    trace_fn!("eval_program");
    let frame = library().function();
    for (name, value) in bindings {
        frame.define(name, value);
    }

    let mut vm = Machine::new(frame);
    vm.run_body(&program.body)
}

/// Parses `code` as a single expression and evaluates it with `bindings` in
/// scope.
pub fn eval_expression(
    code: &str,
    file_id: FileId,
    bindings: impl IntoIterator<Item = (EcoString, Value)>,
) -> SourceResult<Value> {
    trace_fn!("eval_expression", "{}", code);
    let expr = dot_syntax::parse_expression(code, file_id).map_err(syntax_errors)?;
    eval_expr_in(&expr, library(), bindings)
}

fn eval_expr_in(
    expr: &ast::Expr,
    global: Env,
    bindings: impl IntoIterator<Item = (EcoString, Value)>,
) -> SourceResult<Value> {
    let frame = global.function();
    for (name, value) in bindings {
        frame.define(name, value);
    }
    expr.eval(&mut Machine::new(frame))
}
