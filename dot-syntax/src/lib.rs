//! Syntax of dot script, the JavaScript-flavoured language that compiled dot
//! templates are expressed in.

pub mod ast;
mod error;
mod escape;
mod file;
mod kind;
mod lexer;
mod parser;
mod precedence;
mod set;
mod source;
mod span;
#[cfg(test)]
mod test_utils;

pub use error::SyntaxError;
pub use escape::{flatten_code, unescape_json};
pub use file::{FileId, VirtualPath};
pub use kind::SyntaxKind;
pub use lexer::{Lexer, Token, is_ident_mid, is_ident_start};
pub use parser::{parse, parse_expression};
pub use source::Source;
pub use span::Span;
