//! Turns resolved template text into the body of the render function.

mod codegen;
mod lexer;
mod strip;

pub use codegen::generate;
pub use lexer::{Instruction, lex};
pub use strip::strip;
