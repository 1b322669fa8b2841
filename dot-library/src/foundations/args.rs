use crate::diag::{SourceResult, Spanned, bail};
use crate::foundations::value::Value;
use dot_syntax::Span;

/// Arguments of a function call.
///
/// Script functions are lenient: missing arguments read as `undefined` and
/// extra arguments are ignored.
#[derive(Debug, Clone)]
pub struct Args {
    pub span: Span,
    pub items: Vec<Spanned<Value>>,
}

impl Args {
    pub fn new(span: Span, items: impl IntoIterator<Item = Value>) -> Self {
        let items = items
            .into_iter()
            .map(|value| Spanned::new(value, span))
            .collect();
        Self { span, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The argument at `index`, `undefined` if there is none.
    pub fn get(&self, index: usize) -> Value {
        self.items
            .get(index)
            .map(|arg| arg.value.clone())
            .unwrap_or_default()
    }

    /// Removes and returns the first remaining argument.
    pub fn eat(&mut self) -> Option<Value> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.remove(0).value)
    }

    pub fn eat_or_undefined(&mut self) -> Value {
        self.eat().unwrap_or_default()
    }

    pub fn expect(&mut self, what: &str) -> SourceResult<Value> {
        match self.eat() {
            Some(v) => Ok(v),
            None => bail!(self.span, "missing argument `{}`", what),
        }
    }

    /// The first remaining argument converted to a number, `None` if absent
    /// or `undefined`.
    pub fn eat_number(&mut self) -> Option<f64> {
        match self.eat()? {
            Value::Undefined => None,
            value => Some(value.to_number()),
        }
    }

    /// The span of the argument at `index`, or of the whole call.
    pub fn span_of(&self, index: usize) -> Span {
        self.items.get(index).map_or(self.span, |arg| arg.span)
    }
}
