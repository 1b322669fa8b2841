use crate::foundations::value::Value;
use ecow::EcoString;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A shared map from property names to values that remembers insertion order.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<IndexMap<EcoString, Value>>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn insert(&self, key: impl Into<EcoString>, value: impl Into<Value>) {
        self.0.borrow_mut().insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(self, key: impl Into<EcoString>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn keys(&self) -> Vec<EcoString> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn borrow(&self) -> Ref<'_, IndexMap<EcoString, Value>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(map) => f.debug_map().entries(map.iter()).finish(),
            Err(_) => f.pad("{..}"),
        }
    }
}

impl FromIterator<(EcoString, Value)> for Object {
    fn from_iter<T: IntoIterator<Item = (EcoString, Value)>>(iter: T) -> Self {
        Self(Rc::new(RefCell::new(iter.into_iter().collect())))
    }
}
