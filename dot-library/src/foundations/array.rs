use crate::foundations::value::Value;
use ecow::EcoString;
use itertools::Itertools;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A shared, growable list of values.
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(values: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(values)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Value {
        self.0.borrow().get(index).cloned().unwrap_or_default()
    }

    /// Sets `index`, filling any gap with `undefined`.
    pub fn set(&self, index: usize, value: Value) {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value;
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        self.0.borrow_mut()
    }

    /// A copy of the current elements, so callbacks may mutate the array
    /// while it is iterated.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Joins the elements like `Array.prototype.join`, nullish elements
    /// become empty strings.
    ///
    /// An array that contains itself joins to an empty string where it
    /// repeats.
    pub fn join(&self, separator: &str) -> EcoString {
        self.visit(|| {
            self.snapshot()
                .iter()
                .map(|value| match value {
                    Value::Undefined | Value::Null => EcoString::new(),
                    value => value.to_js_string(),
                })
                .join(separator)
                .into()
        })
        .unwrap_or_default()
    }

    /// Runs `f`, or returns `None` if this array is already being visited
    /// further up the stack.
    fn visit<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let ptr = Rc::as_ptr(&self.0) as usize;
        if VISITING.with_borrow(|visiting| visiting.contains(&ptr)) {
            return None;
        }

        VISITING.with_borrow_mut(|visiting| visiting.push(ptr));
        let result = f();
        VISITING.with_borrow_mut(|visiting| visiting.pop());
        Some(result)
    }
}

thread_local! {
    /// Arrays currently being joined or formatted on this thread.
    static VISITING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.visit(|| match self.0.try_borrow() {
            Ok(items) => f.debug_list().entries(items.iter()).finish(),
            Err(_) => f.pad("[..]"),
        })
        .unwrap_or_else(|| f.pad("[..]"))
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_nested_self() {
        let array = Array::from_vec(vec![Value::from(1.0)]);
        array.push(Value::Array(array.clone()));
        assert_eq!(array.join(","), "1,");
        assert_eq!(format!("{array:?}"), "[1, [..]]");
    }

    #[test]
    fn join_repeats_shared_siblings() {
        let inner = Array::from_vec(vec![Value::from("a")]);
        let outer = Array::from_vec(vec![Value::Array(inner.clone()), Value::Array(inner)]);
        assert_eq!(outer.join("-"), "a-a");
    }
}
