use crate::ast::ops::{AssignOp, BinOp, UnOp, UpdateOp};
use crate::ast::statement::Stmt;
use crate::span::Span;
use ecow::EcoString;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether the expression can appear on the left of an assignment.
    pub fn is_place(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(EcoString),
    Template(Vec<TemplatePart>),
    Bool(bool),
    Null,
    Ident(EcoString),
    Array(Vec<Expr>),
    Object(Vec<(EcoString, Expr)>),
    /// `target.name`
    Member {
        target: Box<Expr>,
        name: EcoString,
    },
    /// `target[index]`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Func(Arc<FuncDef>),
    Unary {
        op: UnOp,
        expr: Box<Expr>,
    },
    /// `++x`, `x--`, ...
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(EcoString),
    Expr(Expr),
}

/// A function literal, declaration or arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: Option<EcoString>,
    pub params: Vec<EcoString>,
    pub body: FuncBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuncBody {
    Block(Vec<Stmt>),
    /// The body of `x => expr`.
    Expr(Box<Expr>),
}
