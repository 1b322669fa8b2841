use crate::ast::{Decl, DeclKind, Declarator, Stmt, StmtKind};
use crate::kind::SyntaxKind;
use crate::parser::expressions::expression;
use crate::parser::funcs::function;
use crate::parser::parser_impl::{PResult, Parser};
use crate::set;
use dot_utils::trace_fn;

/// Parses statements until `end` (which is not consumed) or the end of input.
pub(super) fn statement_list(p: &mut Parser, end: SyntaxKind) -> Vec<Stmt> {
    let mut body = vec![];
    while !p.at(end) && !p.end() {
        match statement(p) {
            Ok(stmt) => body.push(stmt),
            Err(error) => p.recover(error, set::STMT_RECOVER),
        }
    }
    body
}

pub(super) fn statement(p: &mut Parser) -> PResult<Stmt> {
    trace_fn!("parse_statement", "{:?}", p.current());
    let start = p.current_span();

    let kind = match p.current() {
        SyntaxKind::Let | SyntaxKind::Var | SyntaxKind::Const => {
            let decl = declaration(p)?;
            end_of_statement(p)?;
            StmtKind::Decl(decl)
        }
        SyntaxKind::If => return if_statement(p),
        SyntaxKind::For => return for_statement(p),
        SyntaxKind::While => {
            p.eat();
            let open = p.expect(SyntaxKind::LeftParen)?.span;
            let test = expression(p)?;
            p.expect_closing(SyntaxKind::RightParen, open)?;
            let body = Box::new(statement(p)?);
            StmtKind::While { test, body }
        }
        SyntaxKind::LeftBrace => StmtKind::Block(block(p)?),
        SyntaxKind::Return => {
            p.eat();
            let value = if p.at_set(set::STMT_RECOVER) {
                None
            } else {
                Some(expression(p)?)
            };
            end_of_statement(p)?;
            StmtKind::Return(value)
        }
        SyntaxKind::Break => {
            p.eat();
            end_of_statement(p)?;
            StmtKind::Break
        }
        SyntaxKind::Continue => {
            p.eat();
            end_of_statement(p)?;
            StmtKind::Continue
        }
        SyntaxKind::Function if p.peek() == SyntaxKind::Ident => {
            StmtKind::Function(function(p)?)
        }
        SyntaxKind::Semicolon => {
            p.eat();
            StmtKind::Empty
        }
        _ => {
            let expr = expression(p)?;
            end_of_statement(p)?;
            StmtKind::Expr(expr)
        }
    };

    Ok(Stmt::new(kind, p.span_from(start)))
}

/// Statements end with `;`, which may be left out before `}` and at the end
/// of input.
fn end_of_statement(p: &mut Parser) -> PResult<()> {
    if p.eat_if(SyntaxKind::Semicolon) || p.at(SyntaxKind::RightBrace) || p.end() {
        return Ok(());
    }
    Err(p.expected("`;`"))
}

/// Parses `{ statements }`.
pub(super) fn block(p: &mut Parser) -> PResult<Vec<Stmt>> {
    let open = p.expect(SyntaxKind::LeftBrace)?.span;
    let body = statement_list(p, SyntaxKind::RightBrace);
    p.expect_closing(SyntaxKind::RightBrace, open)?;
    Ok(body)
}

/// Parses `let a = 1, b` without the trailing semicolon.
fn declaration(p: &mut Parser) -> PResult<Decl> {
    let kind = match p.eat().kind {
        SyntaxKind::Var => DeclKind::Var,
        SyntaxKind::Const => DeclKind::Const,
        _ => DeclKind::Let,
    };

    let mut declarators = vec![];
    loop {
        let name = p.expect(SyntaxKind::Ident)?;
        let init = if p.eat_if(SyntaxKind::Eq) {
            Some(expression(p)?)
        } else {
            None
        };
        declarators.push(Declarator {
            name: name.text.into(),
            init,
            span: p.span_from(name.span),
        });

        if !p.eat_if(SyntaxKind::Comma) {
            break;
        }
    }

    Ok(Decl { kind, declarators })
}

fn if_statement(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect(SyntaxKind::If)?.span;
    let open = p.expect(SyntaxKind::LeftParen)?.span;
    let test = expression(p)?;
    p.expect_closing(SyntaxKind::RightParen, open)?;

    let then = Box::new(statement(p)?);
    let otherwise = if p.eat_if(SyntaxKind::Else) {
        Some(Box::new(statement(p)?))
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            test,
            then,
            otherwise,
        },
        p.span_from(start),
    ))
}

fn for_statement(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect(SyntaxKind::For)?.span;
    let open = p.expect(SyntaxKind::LeftParen)?.span;

    let init = if p.at(SyntaxKind::Semicolon) {
        None
    } else if p.at_set(set::DECL) {
        let init_start = p.current_span();
        let decl = declaration(p)?;
        Some(Box::new(Stmt::new(
            StmtKind::Decl(decl),
            p.span_from(init_start),
        )))
    } else {
        let expr = expression(p)?;
        let span = expr.span;
        Some(Box::new(Stmt::new(StmtKind::Expr(expr), span)))
    };
    p.expect(SyntaxKind::Semicolon)?;

    let test = if p.at(SyntaxKind::Semicolon) {
        None
    } else {
        Some(expression(p)?)
    };
    p.expect(SyntaxKind::Semicolon)?;

    let update = if p.at(SyntaxKind::RightParen) {
        None
    } else {
        Some(expression(p)?)
    };
    p.expect_closing(SyntaxKind::RightParen, open)?;

    let body = Box::new(statement(p)?);

    Ok(Stmt::new(
        StmtKind::For {
            init,
            test,
            update,
            body,
        },
        p.span_from(start),
    ))
}
