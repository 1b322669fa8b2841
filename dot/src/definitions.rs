//! Compile-time snippets and the cache of their parameterized expansions.

use dot_library::Value;
use dot_library::foundations::{Array, Object};
use ecow::EcoString;
use indexmap::IndexMap;

/// A named compile-time snippet.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// Template text spliced in where the snippet is used.
    Text(EcoString),
    /// Template text with one formal parameter, as in `{{##def.tmp:foo:...#}}`.
    Snippet { param: EcoString, body: EcoString },
    /// The result of a computed define like `{{##def.n = 1 + 1#}}`.
    Value(Value),
}

impl Definition {
    /// How the definition looks to code as a property of `def`.
    pub fn to_value(&self) -> Value {
        match self {
            Definition::Text(text) => Value::Str(text.clone()),
            Definition::Snippet { param, body } => Value::Object(
                Object::new()
                    .with("arg", param.clone())
                    .with("text", body.clone()),
            ),
            Definition::Value(value) => value.clone(),
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Str(text) => Definition::Text(text),
            other => Definition::Value(other),
        }
    }
}

/// The snippets known to a compile call, in definition order.
///
/// Passed by the caller and extended in place by the defines a template
/// declares. A name that is already present is never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions(IndexMap<EcoString, Definition>);

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<EcoString>, definition: Definition) {
        self.0.insert(name.into(), definition);
    }

    /// Adds a text snippet.
    pub fn with_text(mut self, name: impl Into<EcoString>, text: impl Into<EcoString>) -> Self {
        self.insert(name, Definition::Text(text.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EcoString, &Definition)> {
        self.0.iter()
    }

    /// The `def` object define and use code is evaluated against.
    pub fn to_object(&self) -> Object {
        self.0
            .iter()
            .map(|(name, definition)| (name.clone(), definition.to_value()))
            .collect()
    }

    /// Takes over properties that code added to a `def` object.
    pub fn absorb(&mut self, object: &Object) {
        for (name, value) in object.borrow().iter() {
            if !self.contains(name) {
                self.insert(name.clone(), Definition::from_value(value.clone()));
            }
        }
    }
}

impl<K: Into<EcoString>> FromIterator<(K, Definition)> for Definitions {
    fn from_iter<T: IntoIterator<Item = (K, Definition)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Identifies one expansion of a parameterized snippet.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ExpansionKey {
    pub name: EcoString,
    pub argument: EcoString,
}

/// Expansions of parameterized snippets made during one compile call.
#[derive(Debug, Default)]
pub struct ExpansionCache(IndexMap<ExpansionKey, EcoString>);

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot of the expansion for `key`, computing it on first use.
    pub fn expand(&mut self, key: ExpansionKey, expand: impl FnOnce() -> EcoString) -> usize {
        let entry = self.0.entry(key);
        let index = entry.index();
        entry.or_insert_with(expand);
        index
    }

    pub fn get(&self, key: &ExpansionKey) -> Option<&EcoString> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The expansions by slot, as the `__expansions` array code indexes into.
    pub fn to_array(&self) -> Array {
        self.0.values().cloned().map(Value::Str).collect()
    }
}

/// Replaces every whole-word occurrence of `param` in `body` with `argument`.
///
/// Words are made of ASCII letters, digits, `_` and `$`.
pub fn substitute(body: &str, param: &str, argument: &str) -> EcoString {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    if param.is_empty() {
        return body.into();
    }

    let mut out = EcoString::with_capacity(body.len());
    let mut rest = body;
    let mut prev: Option<char> = None;
    while let Some(found) = rest.find(param) {
        let before = rest[..found].chars().next_back().or(prev);
        let after = rest[found + param.len()..].chars().next();
        out.push_str(&rest[..found]);
        if before.is_none_or(|c| !is_word(c)) && after.is_none_or(|c| !is_word(c)) {
            out.push_str(argument);
        } else {
            out.push_str(param);
        }
        prev = param.chars().next_back();
        rest = &rest[found + param.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_whole_words_only() {
        assert_eq!(substitute("{{=foo}} food $foo foo", "foo", "bar"), "{{=bar}} food $foo bar");
        assert_eq!(substitute("foo", "foo", "bar"), "bar");
        assert_eq!(substitute("a.foo.b", "foo", "x"), "a.x.b");
        assert_eq!(substitute("foofoo", "foo", "x"), "foofoo");
    }

    #[test]
    fn expansion_keys_include_the_argument() {
        let mut cache = ExpansionCache::new();
        let first = cache.expand(
            ExpansionKey { name: "tmp".into(), argument: "a".into() },
            || "A".into(),
        );
        let second = cache.expand(
            ExpansionKey { name: "tmp".into(), argument: "b".into() },
            || "B".into(),
        );
        let again = cache.expand(
            ExpansionKey { name: "tmp".into(), argument: "a".into() },
            || unreachable!("cached"),
        );

        assert_eq!((first, second, again), (0, 1, 0));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn snippets_appear_as_objects() {
        let defs = Definitions::new().with_text("plain", "text");
        let mut defs = defs;
        defs.insert(
            "tmp",
            Definition::Snippet { param: "foo".into(), body: "{{=foo}}".into() },
        );

        let object = defs.to_object();
        assert_eq!(object.get("plain"), Some(Value::from("text")));
        let Some(Value::Object(snippet)) = object.get("tmp") else {
            panic!("snippet is not an object");
        };
        assert_eq!(snippet.get("arg"), Some(Value::from("foo")));
    }
}
