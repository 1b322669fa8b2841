use crate::diag::SourceResult;
use crate::foundations::args::Args;
use crate::foundations::func::Closure;
use crate::foundations::value::Value;

/// The part of the evaluator that native functions need: calling back into
/// script closures, for example from `Array.prototype.map`.
pub trait Vm {
    fn call_closure(&mut self, closure: &Closure, args: Args) -> SourceResult<Value>;
}
