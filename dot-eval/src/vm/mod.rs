use crate::Eval;
use crate::hoist::hoist;
use dot_error_codes::E0009_CALL_DEPTH_EXCEEDED;
use dot_library::diag::{SourceResult, Trace, TracePoint, bail, error};
use dot_library::foundations::{Args, Closure, Env, Func};
use dot_library::{Value, Vm};
use dot_syntax::Span;
use dot_syntax::ast::{FuncBody, Stmt};
use dot_utils::{defer, trace_fn};
use std::ops::DerefMut;

/// How deep script functions may call each other.
const MAX_CALL_DEPTH: usize = 100;

pub struct Machine {
    /// The innermost scope.
    pub env: Env,
    pub flow: Option<FlowEvent>,
    depth: usize,
}

#[derive(Debug, Clone)]
pub enum FlowEvent {
    Continue(Span),
    Break(Span),
    Return(Span, Value),
}

impl FlowEvent {
    pub fn span(&self) -> Span {
        match self {
            FlowEvent::Continue(span) | FlowEvent::Break(span) | FlowEvent::Return(span, _) => {
                *span
            }
        }
    }
}

impl Vm for Machine {
    fn call_closure(&mut self, closure: &Closure, mut args: Args) -> SourceResult<Value> {
        let def = &closure.def;
        trace_fn!("call_closure", "{:?}", def.name);

        if self.depth >= MAX_CALL_DEPTH {
            bail!(
                error!(args.span, "maximum call depth of {} exceeded", MAX_CALL_DEPTH)
                    .with_code(&E0009_CALL_DEPTH_EXCEEDED)
                    .with_hint("check for a function that calls itself without end")
            );
        }

        let frame = closure.env.function();
        for param in &def.params {
            frame.define(param.clone(), args.eat_or_undefined());
        }
        if let Some(name) = &def.name {
            // Named function expressions can refer to themselves.
            if frame.lookup(name).is_none() {
                frame.define(name.clone(), closure_value(closure));
            }
        }

        let call_span = args.span;
        let mut vm = self.enter(frame);
        vm.depth += 1;
        let result = match &def.body {
            FuncBody::Block(body) => vm.run_body(body),
            FuncBody::Expr(expr) => expr.eval(&mut *vm),
        };
        vm.depth -= 1;
        result.trace(|| TracePoint::Call(def.name.clone()), call_span)
    }
}

fn closure_value(closure: &Closure) -> Value {
    Value::Func(Func::closure(closure.def.clone(), closure.env.clone()))
}

impl Machine {
    pub fn new(env: Env) -> Self {
        Self {
            env,
            flow: None,
            depth: 0,
        }
    }

    /// Makes `env` the current scope until the returned guard is dropped.
    #[must_use]
    pub(crate) fn enter(&mut self, env: Env) -> impl DerefMut<Target = Self> {
        let prev = std::mem::replace(&mut self.env, env);
        defer(self, move |vm| vm.env = prev)
    }

    /// Runs `f` in a fresh block scope.
    pub(crate) fn in_block<T>(&mut self, f: impl FnOnce(&mut Machine) -> T) -> T {
        let block = self.env.block();
        let mut vm = self.enter(block);
        f(&mut *vm)
    }

    /// Runs a function body in the current scope, which must be a fresh
    /// function frame, and returns what it returns.
    pub(crate) fn run_body(&mut self, body: &[Stmt]) -> SourceResult<Value> {
        hoist(&self.env, body);
        self.run_statements(body)?;
        match self.flow.take() {
            Some(FlowEvent::Return(_, value)) => Ok(value),
            Some(FlowEvent::Break(span)) => bail!(span, "`break` outside of a loop"),
            Some(FlowEvent::Continue(span)) => bail!(span, "`continue` outside of a loop"),
            None => Ok(Value::Undefined),
        }
    }

    /// Runs statements until one of them raises a flow event.
    pub(crate) fn run_statements(&mut self, statements: &[Stmt]) -> SourceResult<()> {
        crate::hoist::hoist_functions(&self.env, statements);
        for statement in statements {
            statement.eval(self)?;
            if self.flow.is_some() {
                break;
            }
        }
        Ok(())
    }
}
