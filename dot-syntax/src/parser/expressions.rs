use crate::ast::{AssignOp, BinOp, Expr, ExprKind, TemplatePart, UnOp, UpdateOp};
use crate::error::SyntaxError;
use crate::escape::unescape;
use crate::kind::SyntaxKind;
use crate::lexer::{TemplatePiece, template_pieces};
use crate::parser::funcs::{args, arrow_function, at_arrow_params, function};
use crate::parser::parse_expression_at;
use crate::parser::parser_impl::{PResult, Parser};
use crate::precedence::{Precedence, PrecedenceTrait};
use crate::set::syntax_set;
use crate::span::Span;
use dot_error_codes::{E0002_INVALID_ASSIGNMENT, E0004_EXPECTED_EXPRESSION};
use dot_utils::{trace_fn, trace_log};
use ecow::{EcoString, eco_format};

pub(crate) fn expression(p: &mut Parser) -> PResult<Expr> {
    expr_prec(p, Precedence::Lowest)
}

pub(crate) fn expr_prec(p: &mut Parser, min_prec: Precedence) -> PResult<Expr> {
    trace_fn!("parse_expr_prec", "{min_prec:?} at {:?}", p.current());

    let mut lhs = prefix_expr(p)?;

    loop {
        if let Some(op) = BinOp::from_kind(p.current()) {
            let prec = op.precedence();
            if prec <= min_prec {
                break;
            }
            p.eat();
            let rhs = expr_prec(p, prec)?;
            let span = Span::join(lhs.span, rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
            continue;
        }

        if p.at(SyntaxKind::Question) && Precedence::Conditional > min_prec {
            p.eat();
            let then = expr_prec(p, Precedence::Lowest)?;
            p.expect(SyntaxKind::Colon)?;
            let otherwise = expr_prec(p, Precedence::Lowest)?;
            let span = Span::join(lhs.span, otherwise.span);
            lhs = Expr::new(
                ExprKind::Conditional {
                    test: Box::new(lhs),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                },
                span,
            );
            continue;
        }

        if let Some(op) = AssignOp::from_kind(p.current())
            && Precedence::Assign > min_prec
        {
            if !lhs.is_place() {
                return Err(invalid_assignment(p, &lhs, op));
            }
            p.eat();
            let value = expr_prec(p, Precedence::Lowest)?;
            let span = Span::join(lhs.span, value.span);
            lhs = Expr::new(
                ExprKind::Assign {
                    op,
                    target: Box::new(lhs),
                    value: Box::new(value),
                },
                span,
            );
            continue;
        }

        break;
    }

    Ok(lhs)
}

fn invalid_assignment(p: &Parser, lhs: &Expr, op: AssignOp) -> SyntaxError {
    SyntaxError::new(
        eco_format!("cannot assign with `{}` to this expression", op.as_str()),
        lhs.span,
    )
    .with_code(&E0002_INVALID_ASSIGNMENT)
    .with_label_message("not a variable, property or index")
    .with_hint(eco_format!(
        "only identifiers like `x`, properties like `it.x` and indexes like `it[0]` can be assigned, found {}",
        p.current().descriptive_name()
    ))
}

/// Parses unary and prefix update operators, then a postfix expression.
fn prefix_expr(p: &mut Parser) -> PResult<Expr> {
    let start = p.current_span();

    if let Some(op) = UnOp::from_kind(p.current()) {
        p.eat();
        let expr = expr_prec(p, op.precedence())?;
        return Ok(Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            p.span_from(start),
        ));
    }

    if let Some(op) = UpdateOp::from_kind(p.current()) {
        p.eat();
        let target = expr_prec(p, Precedence::Prefix)?;
        if !target.is_place() {
            return Err(SyntaxError::new("invalid update target", target.span)
                .with_code(&E0002_INVALID_ASSIGNMENT));
        }
        return Ok(Expr::new(
            ExprKind::Update {
                op,
                prefix: true,
                target: Box::new(target),
            },
            p.span_from(start),
        ));
    }

    let primary = primary_expr(p)?;
    postfix_expr(p, primary)
}

/// Member access, indexing, calls and postfix updates.
fn postfix_expr(p: &mut Parser, mut expr: Expr) -> PResult<Expr> {
    let start = expr.span;
    loop {
        match p.current() {
            SyntaxKind::Dot => {
                p.eat();
                let name = property_name(p)?;
                expr = Expr::new(
                    ExprKind::Member {
                        target: Box::new(expr),
                        name,
                    },
                    p.span_from(start),
                );
            }
            SyntaxKind::LeftBracket => {
                let open = p.eat().span;
                let index = expression(p)?;
                p.expect_closing(SyntaxKind::RightBracket, open)?;
                expr = Expr::new(
                    ExprKind::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                    },
                    p.span_from(start),
                );
            }
            SyntaxKind::LeftParen => {
                let args = args(p)?;
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    p.span_from(start),
                );
            }
            SyntaxKind::PlusPlus | SyntaxKind::MinusMinus if expr.is_place() => {
                let op = UpdateOp::from_kind(p.eat().kind).expect("checked to be an update op");
                return Ok(Expr::new(
                    ExprKind::Update {
                        op,
                        prefix: false,
                        target: Box::new(expr),
                    },
                    p.span_from(start),
                ));
            }
            _ => return Ok(expr),
        }
    }
}

/// The name after a `.`, keywords included.
fn property_name(p: &mut Parser) -> PResult<EcoString> {
    if p.at(SyntaxKind::Ident) || p.current().is_keyword() {
        return Ok(p.eat().text.into());
    }
    Err(p.expected("a property name"))
}

/// Parse a primary expression.
///
/// A primary expressions are the building blocks in composable expressions.
fn primary_expr(p: &mut Parser) -> PResult<Expr> {
    trace_fn!("parse_primary_expr");
    let start = p.current_span();

    let kind = match p.current() {
        SyntaxKind::Ident if p.peek() == SyntaxKind::Arrow => {
            return arrow_function(p);
        }
        SyntaxKind::LeftParen if at_arrow_params(p) => {
            return arrow_function(p);
        }
        SyntaxKind::Ident => ExprKind::Ident(p.eat().text.into()),
        SyntaxKind::Number => {
            let text = p.eat().text;
            ExprKind::Number(text.parse().unwrap_or(f64::NAN))
        }
        SyntaxKind::Str => {
            let text = p.eat().text;
            ExprKind::Str(unescape(&text[1..text.len() - 1]))
        }
        SyntaxKind::Template => template(p)?,
        SyntaxKind::True => {
            p.eat();
            ExprKind::Bool(true)
        }
        SyntaxKind::False => {
            p.eat();
            ExprKind::Bool(false)
        }
        SyntaxKind::Null => {
            p.eat();
            ExprKind::Null
        }
        SyntaxKind::LeftParen => {
            let open = p.eat().span;
            let inner = expression(p)?;
            p.expect_closing(SyntaxKind::RightParen, open)?;
            // Keep the parentheses in the span for diagnostics.
            return Ok(Expr::new(inner.kind, p.span_from(start)));
        }
        SyntaxKind::LeftBracket => array(p)?,
        SyntaxKind::LeftBrace => object(p)?,
        SyntaxKind::Function => ExprKind::Func(function(p)?),
        _ => return Err(expected_expression(p)),
    };

    Ok(Expr::new(kind, p.span_from(start)))
}

fn expected_expression(p: &Parser) -> SyntaxError {
    let error = SyntaxError::new(
        eco_format!("expected expression, found {}", p.current().descriptive_name()),
        p.current_span(),
    )
    .with_code(&E0004_EXPECTED_EXPRESSION);

    if p.at_set(syntax_set!(RightParen, RightBrace, RightBracket, End)) {
        error.with_hint("an expression may be incomplete or a directive may be missing its content")
    } else {
        error
    }
}

fn array(p: &mut Parser) -> PResult<ExprKind> {
    let open = p.expect(SyntaxKind::LeftBracket)?.span;
    let mut items = vec![];
    while !p.at(SyntaxKind::RightBracket) && !p.end() {
        items.push(expression(p)?);
        if !p.eat_if(SyntaxKind::Comma) {
            break;
        }
    }
    p.expect_closing(SyntaxKind::RightBracket, open)?;
    Ok(ExprKind::Array(items))
}

fn object(p: &mut Parser) -> PResult<ExprKind> {
    let open = p.expect(SyntaxKind::LeftBrace)?.span;
    let mut entries = vec![];
    while !p.at(SyntaxKind::RightBrace) && !p.end() {
        let key_token = p.current_text();
        let key_span = p.current_span();
        let key: EcoString = match p.current() {
            SyntaxKind::Ident => p.eat().text.into(),
            SyntaxKind::Str => {
                p.eat();
                unescape(&key_token[1..key_token.len() - 1])
            }
            SyntaxKind::Number => {
                let number: f64 = p.eat().text.parse().unwrap_or(f64::NAN);
                eco_format!("{number}")
            }
            kind if kind.is_keyword() => p.eat().text.into(),
            _ => return Err(p.expected("a property name")),
        };

        let value = if p.eat_if(SyntaxKind::Colon) {
            expression(p)?
        } else {
            // Shorthand `{ a }`.
            trace_log!("shorthand property {key}");
            Expr::new(ExprKind::Ident(key.clone()), key_span)
        };
        entries.push((key, value));

        if !p.eat_if(SyntaxKind::Comma) {
            break;
        }
    }
    p.expect_closing(SyntaxKind::RightBrace, open)?;
    Ok(ExprKind::Object(entries))
}

/// Splits a template literal into text and `${}` expressions, parsing each
/// expression in place so its spans point into the original source.
fn template(p: &mut Parser) -> PResult<ExprKind> {
    let token = p.eat();
    let base = token.span.range().map(|r| r.start).unwrap_or(0);
    let Some(pieces) = template_pieces(token.text) else {
        return Err(SyntaxError::new("unclosed template literal", token.span));
    };

    let mut parts = vec![];
    for piece in pieces {
        match piece {
            TemplatePiece::Text(range) => {
                if !range.is_empty() {
                    parts.push(TemplatePart::Text(unescape(&token.text[range])));
                }
            }
            TemplatePiece::Code(range) => {
                let code = &token.text[range.clone()];
                match parse_expression_at(code, p.file_id(), base + range.start) {
                    Ok(expr) => parts.push(TemplatePart::Expr(expr)),
                    Err(mut errors) => {
                        let last = errors.pop().unwrap_or_else(|| {
                            SyntaxError::new("invalid template slot", token.span)
                        });
                        p.errors.extend(errors);
                        return Err(last);
                    }
                }
            }
        }
    }

    Ok(ExprKind::Template(parts))
}
