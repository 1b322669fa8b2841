use crate::access::Place;
use crate::{Eval, Machine};
use dot_library::Value;
use dot_library::diag::SourceResult;
use dot_library::foundations::ops;
use dot_syntax::Span;
use dot_syntax::ast::{AssignOp, BinOp, Expr, ExprKind, UnOp, UpdateOp};
use std::cmp::Ordering;

pub(super) fn binary(op: BinOp, lhs: &Expr, rhs: &Expr, vm: &mut Machine) -> SourceResult<Value> {
    let left = lhs.eval(vm)?;

    match op {
        BinOp::And if !left.truthy() => return Ok(left),
        BinOp::Or if left.truthy() => return Ok(left),
        BinOp::Nullish if !left.is_nullish() => return Ok(left),
        BinOp::And | BinOp::Or | BinOp::Nullish => return rhs.eval(vm),
        _ => {}
    }

    let right = rhs.eval(vm)?;
    Ok(apply(op, &left, &right))
}

/// Applies a non short-circuiting binary operator.
pub(super) fn apply(op: BinOp, left: &Value, right: &Value) -> Value {
    let ordered = |accept: fn(Ordering) -> bool| {
        Value::Bool(ops::compare(left, right).is_some_and(accept))
    };

    match op {
        BinOp::Add => ops::add(left, right),
        BinOp::Sub => ops::sub(left, right),
        BinOp::Mul => ops::mul(left, right),
        BinOp::Div => ops::div(left, right),
        BinOp::Mod => ops::rem(left, right),
        BinOp::Eq => Value::Bool(ops::loose_eq(left, right)),
        BinOp::Neq => Value::Bool(!ops::loose_eq(left, right)),
        BinOp::StrictEq => Value::Bool(ops::strict_eq(left, right)),
        BinOp::StrictNeq => Value::Bool(!ops::strict_eq(left, right)),
        BinOp::Lt => ordered(Ordering::is_lt),
        BinOp::Lte => ordered(Ordering::is_le),
        BinOp::Gt => ordered(Ordering::is_gt),
        BinOp::Gte => ordered(Ordering::is_ge),
        BinOp::And | BinOp::Or | BinOp::Nullish => unreachable!("short circuiting operator"),
    }
}

pub(super) fn unary(op: UnOp, expr: &Expr, vm: &mut Machine) -> SourceResult<Value> {
    // `typeof` of an undeclared name is not an error.
    if op == UnOp::Typeof
        && let ExprKind::Ident(name) = &expr.kind
        && vm.env.lookup(name).is_none()
    {
        return Ok(Value::str("undefined"));
    }

    let value = expr.eval(vm)?;
    Ok(match op {
        UnOp::Plus => ops::pos(&value),
        UnOp::Minus => ops::neg(&value),
        UnOp::Not => ops::not(&value),
        UnOp::Typeof => Value::str(value.type_of()),
    })
}

pub(super) fn update(
    op: UpdateOp,
    prefix: bool,
    target: &Expr,
    span: Span,
    vm: &mut Machine,
) -> SourceResult<Value> {
    let place = Place::resolve(target, vm)?;
    let old = place.read(vm, target.span)?.to_number();
    let new = old + op.delta();
    place.write(vm, Value::Number(new), span)?;
    Ok(Value::Number(if prefix { new } else { old }))
}

pub(super) fn assign(
    op: AssignOp,
    target: &Expr,
    value: &Expr,
    span: Span,
    vm: &mut Machine,
) -> SourceResult<Value> {
    let place = Place::resolve(target, vm)?;
    let value = match op.binary() {
        None => value.eval(vm)?,
        Some(binop) => {
            let current = place.read(vm, target.span)?;
            let rhs = value.eval(vm)?;
            apply(binop, &current, &rhs)
        }
    };
    place.write(vm, value.clone(), span)?;
    Ok(value)
}
