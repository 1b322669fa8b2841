use crate::diag::{StrResult, bail};
use crate::foundations::value::Value;
use dot_syntax::ast::DeclKind;
use ecow::EcoString;
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A lexical environment: one scope plus the chain of scopes around it.
///
/// Closures keep their defining environment alive, so it is reference
/// counted and interior mutable.
#[derive(Clone)]
pub struct Env(Rc<Scope>);

struct Scope {
    bindings: RefCell<IndexMap<EcoString, Binding>>,
    parent: Option<Env>,
    kind: ScopeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    /// The body of a function; `var` declarations land here.
    Function,
    Block,
}

#[derive(Debug, Clone)]
pub struct Binding {
    value: Value,
    kind: DeclKind,
}

impl Binding {
    pub fn new(value: Value, kind: DeclKind) -> Self {
        Self { value, kind }
    }

    pub fn read(&self) -> &Value {
        &self.value
    }
}

impl Env {
    pub fn global() -> Self {
        Self::with_parent(None, ScopeKind::Global)
    }

    fn with_parent(parent: Option<Env>, kind: ScopeKind) -> Self {
        Self(Rc::new(Scope {
            bindings: RefCell::new(IndexMap::new()),
            parent,
            kind,
        }))
    }

    pub fn block(&self) -> Self {
        Self::with_parent(Some(self.clone()), ScopeKind::Block)
    }

    pub fn function(&self) -> Self {
        Self::with_parent(Some(self.clone()), ScopeKind::Function)
    }

    pub fn kind(&self) -> ScopeKind {
        self.0.kind
    }

    /// The closest enclosing function or global scope.
    pub fn var_scope(&self) -> Env {
        let mut env = self.clone();
        while env.0.kind == ScopeKind::Block {
            match &env.0.parent {
                Some(parent) => env = parent.clone(),
                None => break,
            }
        }
        env
    }

    pub fn root(&self) -> Env {
        let mut env = self.clone();
        while let Some(parent) = env.0.parent.clone() {
            env = parent;
        }
        env
    }

    /// Defines a builtin or parameter, replacing any existing binding.
    pub fn define(&self, name: impl Into<EcoString>, value: impl Into<Value>) {
        self.0
            .bindings
            .borrow_mut()
            .insert(name.into(), Binding::new(value.into(), DeclKind::Var));
    }

    /// Declares `name` in this scope.
    ///
    /// Redeclaring a `var` keeps its current value when there is no
    /// initializer; `let` and `const` cannot be redeclared.
    pub fn declare(&self, name: &str, value: Option<Value>, kind: DeclKind) -> StrResult<()> {
        let mut bindings = self.0.bindings.borrow_mut();
        match bindings.entry(name.into()) {
            Entry::Vacant(entry) => {
                entry.insert(Binding::new(value.unwrap_or_default(), kind));
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get().kind;
                if kind != DeclKind::Var || existing != DeclKind::Var {
                    bail!("identifier `{}` has already been declared", name);
                }
                if let Some(value) = value {
                    entry.get_mut().value = value;
                }
            }
        }
        Ok(())
    }

    /// Reads `name` from the closest scope that has it.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(binding) = env.0.bindings.borrow().get(name) {
                return Some(binding.read().clone());
            }
            env = env.0.parent.as_ref()?;
        }
    }

    /// Assigns to the closest binding of `name`.
    ///
    /// Assigning to a name that was never declared creates it in the global
    /// scope.
    pub fn assign(&self, name: &str, value: Value) -> StrResult<()> {
        let mut env = self;
        loop {
            if let Some(binding) = env.0.bindings.borrow_mut().get_mut(name) {
                if binding.kind == DeclKind::Const {
                    bail!("cannot assign to constant `{}`", name);
                }
                binding.value = value;
                return Ok(());
            }
            match env.0.parent.as_ref() {
                Some(parent) => env = parent,
                None => break,
            }
        }

        self.root().define(name, value);
        Ok(())
    }

    /// The names bound directly in this scope.
    pub fn names(&self) -> Vec<EcoString> {
        self.0.bindings.borrow().keys().cloned().collect()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("kind", &self.0.kind)
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_shadows_and_restores() {
        let global = Env::global();
        global.define("x", 1.0);
        let block = global.block();
        block.declare("x", Some(2.0.into()), DeclKind::Let).unwrap();
        assert_eq!(block.lookup("x"), Some(Value::Number(2.0)));
        assert_eq!(global.lookup("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_undeclared_assignment_creates_global() {
        let global = Env::global();
        let inner = global.function().block();
        inner.assign("leak", Value::from("x")).unwrap();
        assert_eq!(global.lookup("leak"), Some(Value::from("x")));
    }

    #[test]
    fn test_var_scope_skips_blocks() {
        let function = Env::global().function();
        let block = function.block().block();
        assert_eq!(block.var_scope().kind(), ScopeKind::Function);
    }

    #[test]
    fn test_redeclaration_rules() {
        let env = Env::global();
        env.declare("a", Some(1.0.into()), DeclKind::Var).unwrap();
        env.declare("a", None, DeclKind::Var).unwrap();
        assert_eq!(env.lookup("a"), Some(Value::Number(1.0)));
        assert!(env.declare("a", None, DeclKind::Let).is_err());

        env.declare("c", Some(1.0.into()), DeclKind::Const).unwrap();
        assert!(env.assign("c", 2.0.into()).is_err());
    }
}
