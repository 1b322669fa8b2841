use crate::{eval_expression, eval_program};
use dot_error_codes::ErrorCode;
use dot_library::diag::codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use dot_library::diag::{SourceDiagnostic, SourceResult, syntax_errors, write_diagnostics};
use dot_library::{SourceMap, Value};
use dot_syntax::{FileId, Source};
use ecow::EcoString;
use tap::Pipe;


fn print_diagnostics(source: &Source, errors: &[SourceDiagnostic]) {
    let stdout = StandardStream::stdout(ColorChoice::Never);
    write_diagnostics(
        &SourceMap::new().with(source.clone()),
        errors,
        &mut stdout.lock(),
        &Default::default(),
    )
    .expect("failed to print diagnostics");
}

/// Runs `code` as a program with `it` bound to `data`.
pub fn eval_with(code: &str, data: Value) -> (Source, SourceResult<Value>) {
    let source = Source::from_string("test.dot", code);
    let result = dot_syntax::parse(source.text(), source.id())
        .map_err(syntax_errors)
        .and_then(|program| eval_program(&program, [(EcoString::from("it"), data)]));
    (source, result)
}

#[track_caller]
pub fn assert_eval(code: &str) -> Value {
    assert_eval_with(code, Value::Undefined)
}

#[track_caller]
pub fn assert_eval_with(code: &str, data: Value) -> Value {
    match eval_with(code, data) {
        (_, Ok(value)) => value,
        (source, Err(errors)) => {
            print_diagnostics(&source, &errors);
            panic!("expected no errors, but got: {errors:?}")
        }
    }
}

/// Runs `code` and returns the codes of the errors it fails with.
#[track_caller]
pub fn eval_err(code: &str) -> Vec<&'static ErrorCode> {
    match eval_with(code, Value::Undefined) {
        (_, Ok(value)) => panic!("expected errors, but got {value:?}"),
        (_, Err(errors)) => errors.iter().filter_map(|e| e.code).collect(),
    }
}

#[track_caller]
pub fn eval_expr(code: &str) -> Value {
    eval_expression(code, FileId::new("expr.dot"), [])
        .pipe(|result| match result {
            Ok(value) => value,
            Err(errors) => panic!("failed to evaluate `{code}`: {errors:?}"),
        })
}
