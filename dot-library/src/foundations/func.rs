use crate::diag::SourceResult;
use crate::foundations::args::Args;
use crate::foundations::methods;
use crate::foundations::scope::Env;
use crate::foundations::value::Value;
use crate::vm::Vm;
use dot_syntax::ast::FuncDef;
use ecow::EcoString;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A callable value.
#[derive(Clone)]
pub struct Func(Repr);

#[derive(Clone)]
enum Repr {
    Native(&'static NativeFuncData),
    Closure(Rc<Closure>),
    /// A builtin method looked up on a value, like `items.push`.
    Method { this: Box<Value>, name: EcoString },
}

/// A function implemented in Rust.
pub struct NativeFuncData {
    pub name: &'static str,
    pub func: fn(&mut dyn Vm, &mut Args) -> SourceResult<Value>,
}

/// A function written in script, with the environment it was defined in.
pub struct Closure {
    pub def: Arc<FuncDef>,
    pub env: Env,
}

impl Func {
    pub fn native(data: &'static NativeFuncData) -> Self {
        Self(Repr::Native(data))
    }

    pub fn closure(def: Arc<FuncDef>, env: Env) -> Self {
        Self(Repr::Closure(Rc::new(Closure { def, env })))
    }

    pub fn method(this: Value, name: impl Into<EcoString>) -> Self {
        Self(Repr::Method {
            this: Box::new(this),
            name: name.into(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Repr::Native(native) => Some(native.name),
            Repr::Closure(closure) => closure.def.name.as_deref(),
            Repr::Method { name, .. } => Some(name),
        }
    }

    pub fn call(&self, vm: &mut dyn Vm, mut args: Args) -> SourceResult<Value> {
        match &self.0 {
            Repr::Native(native) => (native.func)(vm, &mut args),
            Repr::Closure(closure) => vm.call_closure(closure, args),
            Repr::Method { this, name } => methods::call_method(vm, this, name, args),
        }
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Native(a), Repr::Native(b)) => std::ptr::eq(*a, *b),
            (Repr::Closure(a), Repr::Closure(b)) => Rc::ptr_eq(a, b),
            (Repr::Method { this: a, name: x }, Repr::Method { this: b, name: y }) => {
                x == y && a == b
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "function {name}"),
            None => f.pad("function"),
        }
    }
}
