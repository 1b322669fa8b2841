use crate::ast::{Expr, ExprKind, FuncBody, FuncDef};
use crate::kind::SyntaxKind;
use crate::parser::expressions::expression;
use crate::parser::parser_impl::{PResult, Parser};
use crate::parser::statements::block;
use dot_utils::trace_fn;
use ecow::EcoString;
use std::sync::Arc;

/// Parses call arguments `(a, b, c)`.
pub(super) fn args(p: &mut Parser) -> PResult<Vec<Expr>> {
    let open = p.expect(SyntaxKind::LeftParen)?.span;
    let mut args = vec![];
    while !p.at(SyntaxKind::RightParen) && !p.end() {
        args.push(expression(p)?);
        if !p.eat_if(SyntaxKind::Comma) {
            break;
        }
    }
    p.expect_closing(SyntaxKind::RightParen, open)?;
    Ok(args)
}

/// Parses `function name?(params) { body }`.
pub(super) fn function(p: &mut Parser) -> PResult<Arc<FuncDef>> {
    trace_fn!("parse_function");
    let start = p.expect(SyntaxKind::Function)?.span;

    let name = if p.at(SyntaxKind::Ident) {
        Some(EcoString::from(p.eat().text))
    } else {
        None
    };

    let params = params(p)?;
    let body = FuncBody::Block(block(p)?);

    Ok(Arc::new(FuncDef {
        name,
        params,
        body,
        span: p.span_from(start),
    }))
}

fn params(p: &mut Parser) -> PResult<Vec<EcoString>> {
    let open = p.expect(SyntaxKind::LeftParen)?.span;
    let mut params = vec![];
    while !p.at(SyntaxKind::RightParen) && !p.end() {
        params.push(p.expect(SyntaxKind::Ident)?.text.into());
        if !p.eat_if(SyntaxKind::Comma) {
            break;
        }
    }
    p.expect_closing(SyntaxKind::RightParen, open)?;
    Ok(params)
}

/// Whether the `(` at the current position opens the parameter list of an
/// arrow function: its matching `)` is followed by `=>`.
pub(super) fn at_arrow_params(p: &Parser) -> bool {
    debug_assert!(p.at(SyntaxKind::LeftParen));
    let mut lexer = p.lookahead();
    let mut depth = 0usize;
    loop {
        match lexer.next().kind {
            SyntaxKind::LeftParen => depth += 1,
            SyntaxKind::RightParen if depth == 0 => break,
            SyntaxKind::RightParen => depth -= 1,
            SyntaxKind::End => return false,
            _ => {}
        }
    }
    lexer.next().kind == SyntaxKind::Arrow
}

/// Parses `x => body` or `(a, b) => body`.
pub(super) fn arrow_function(p: &mut Parser) -> PResult<Expr> {
    trace_fn!("parse_arrow_function");
    let start = p.current_span();

    let params = if p.at(SyntaxKind::Ident) {
        vec![p.eat().text.into()]
    } else {
        params(p)?
    };
    p.expect(SyntaxKind::Arrow)?;

    let body = if p.at(SyntaxKind::LeftBrace) {
        FuncBody::Block(block(p)?)
    } else {
        FuncBody::Expr(Box::new(expression(p)?))
    };

    let span = p.span_from(start);
    let def = FuncDef {
        name: None,
        params,
        body,
        span,
    };
    Ok(Expr::new(ExprKind::Func(Arc::new(def)), span))
}

#[cfg(test)]
mod tests {
    use crate::ast::{ExprKind, FuncBody};
    use crate::test_utils::test_parse_expr;

    #[test]
    fn test_arrow_functions() {
        let expr = test_parse_expr("xs.map((x, i) => x + i)");
        let ExprKind::Call { args, .. } = expr.kind else {
            panic!("expected a call");
        };
        let ExprKind::Func(def) = &args[0].kind else {
            panic!("expected a function argument");
        };
        assert_eq!(def.params, ["x", "i"]);
        assert!(matches!(def.body, FuncBody::Expr(_)));

        let expr = test_parse_expr("x => { return x; }");
        assert!(matches!(expr.kind, ExprKind::Func(ref def) if matches!(def.body, FuncBody::Block(_))));
    }

    #[test]
    fn test_parenthesized_expression_is_not_arrow() {
        let expr = test_parse_expr("(a + b) * 2");
        assert!(matches!(expr.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn test_function_expression() {
        let expr = test_parse_expr("(function named(a) { return a; })");
        let ExprKind::Func(def) = expr.kind else {
            panic!("expected a function");
        };
        assert_eq!(def.name.as_deref(), Some("named"));
    }
}
