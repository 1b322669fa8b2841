use crate::ast::{Expr, Program, StmtKind};
use crate::file::FileId;
use crate::error::SyntaxError;
use crate::parser::parse;

pub fn test_file_id() -> FileId {
    FileId::new("test.dot.js")
}

#[track_caller]
pub fn test_parse(code: &str) -> Program {
    match parse(code, test_file_id()) {
        Ok(program) => program,
        Err(errors) => panic!("failed to parse {code:?}: {errors:#?}"),
    }
}

#[track_caller]
pub fn test_parse_err(code: &str) -> Vec<SyntaxError> {
    match parse(code, test_file_id()) {
        Ok(program) => panic!("expected {code:?} to fail, parsed {program:#?}"),
        Err(errors) => errors.into_iter().collect(),
    }
}

/// Parses `code` as a single expression statement.
#[track_caller]
pub fn test_parse_expr(code: &str) -> Expr {
    let mut program = test_parse(code);
    assert_eq!(program.body.len(), 1, "expected a single statement in {code:?}");
    match program.body.remove(0).kind {
        StmtKind::Expr(expr) => expr,
        other => panic!("expected an expression statement, found {other:#?}"),
    }
}
