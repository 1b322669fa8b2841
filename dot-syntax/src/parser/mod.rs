mod expressions;
mod funcs;
mod parser_impl;
mod statements;

use crate::ast::{Expr, Program};
use crate::error::SyntaxError;
use crate::file::FileId;
use crate::kind::SyntaxKind;
use crate::span::Span;
use dot_utils::trace_fn;
use ecow::EcoVec;
use parser_impl::Parser;

/// Parses a whole script.
///
/// Every syntax error in the text is reported; a program is only returned when
/// there are none.
pub fn parse(text: &str, file_id: FileId) -> Result<Program, EcoVec<SyntaxError>> {
    trace_fn!("parse", "{} bytes", text.len());
    let mut p = Parser::new(text, file_id, 0);

    let body = statements::statement_list(&mut p, SyntaxKind::End);
    let span = Span::new(file_id, 0..text.len());

    if p.errors.is_empty() {
        Ok(Program { body, span })
    } else {
        Err(p.errors)
    }
}

/// Parses `text` as a single expression. Trailing tokens are an error.
pub fn parse_expression(text: &str, file_id: FileId) -> Result<Expr, EcoVec<SyntaxError>> {
    parse_expression_at(text, file_id, 0)
}

/// Like [`parse_expression`], for text found at `offset` inside a larger source.
pub(crate) fn parse_expression_at(
    text: &str,
    file_id: FileId,
    offset: usize,
) -> Result<Expr, EcoVec<SyntaxError>> {
    let mut p = Parser::new(text, file_id, offset);

    let result = expressions::expression(&mut p).and_then(|expr| {
        if p.end() {
            Ok(expr)
        } else {
            Err(p.expected("end of expression"))
        }
    });

    match result {
        Ok(expr) if p.errors.is_empty() => Ok(expr),
        Ok(_) => Err(p.errors),
        Err(error) => {
            p.errors.push(error);
            Err(p.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinOp, ExprKind, StmtKind};
    use crate::test_utils::{test_file_id, test_parse, test_parse_err, test_parse_expr};
    use dot_error_codes::{E0001_UNCLOSED_DELIMITER, E0002_INVALID_ASSIGNMENT};

    #[test]
    fn test_generated_render_body() {
        let program = test_parse("let out=`a`+(it.x)+`b`;if(it.y){out+=`c`;}return out;");
        assert_eq!(program.body.len(), 3);
        assert!(matches!(program.body[0].kind, StmtKind::Decl(_)));
        assert!(matches!(program.body[1].kind, StmtKind::If { .. }));
        assert!(matches!(program.body[2].kind, StmtKind::Return(Some(_))));
    }

    #[test]
    fn test_binary_precedence() {
        let expr = test_parse_expr("1 + 2 * 3");
        let ExprKind::Binary { op, rhs, .. } = expr.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(rhs.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_missing_semicolon_before_brace() {
        test_parse("if (a) { b = 1 } c = 2");
    }

    #[test]
    fn test_missing_semicolon_between_statements() {
        let errors = test_parse_err("a = 1 b = 2");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("expected `;`"));
    }

    #[test]
    fn test_every_broken_statement_is_reported() {
        let errors = test_parse_err("a = ; b = 1; c = );");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errors = test_parse_err("a + b = 3;");
        assert_eq!(errors[0].code, Some(&E0002_INVALID_ASSIGNMENT));
    }

    #[test]
    fn test_unclosed_paren() {
        let errors = test_parse_err("f(1, 2");
        assert_eq!(errors[0].code, Some(&E0001_UNCLOSED_DELIMITER));
    }

    #[test]
    fn test_parse_expression_rejects_trailing_tokens() {
        assert!(super::parse_expression("a b", test_file_id()).is_err());
        assert!(super::parse_expression("a.b(c)[0]", test_file_id()).is_ok());
    }
}
