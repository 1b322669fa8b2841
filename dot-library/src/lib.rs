pub mod diag;
pub mod foundations;
pub mod vm;
pub mod world;

pub use diag::{SourceDiagnostic, SourceResult};
pub use foundations::{Value, library};
pub use vm::Vm;
pub use world::{SourceMap, World};
