use crate::ast::expr::{Expr, FuncDef};
use crate::span::Span;
use ecow::EcoString;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    Decl(Decl),
    If {
        test: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    For {
        init: Option<Box<Stmt>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
    Return(Option<Expr>),
    Break,
    Continue,
    Function(Arc<FuncDef>),
    Empty,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeclKind {
    Let,
    Var,
    Const,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Var => "var",
            Self::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: EcoString,
    pub init: Option<Expr>,
    pub span: Span,
}
