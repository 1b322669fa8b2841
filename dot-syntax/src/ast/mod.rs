//! The owned syntax tree of dot script.

mod expr;
mod ops;
mod statement;

pub use expr::*;
pub use ops::*;
pub use statement::*;

use crate::span::Span;

/// A parsed script: the body of a generated render function, or a standalone
/// snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}
