pub mod args;
pub mod array;
pub mod func;
pub mod global_funcs;
pub mod json;
pub mod methods;
pub mod object;
pub mod ops;
pub mod scope;
pub mod value;

pub use args::Args;
pub use array::Array;
pub use func::{Closure, Func, NativeFuncData};
pub use global_funcs::library;
pub use object::Object;
pub use scope::Env;
pub use value::Value;
