use crate::file::{FileId, VirtualPath};
use std::fmt::{Debug, Formatter};
use std::ops::Range;
use std::sync::Arc;

/// A named piece of text: a template or the source generated from one.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct Source(Arc<Repr>);

struct Repr {
    id: FileId,
    text: String,
    /// Byte offsets at which lines start
    lines: Vec<usize>,
}

impl Source {
    pub fn new(id: FileId, text: String) -> Self {
        let lines = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self(Arc::new(Repr { id, text, lines }))
    }

    pub fn from_string(name: &str, text: impl Into<String>) -> Self {
        Self::new(FileId::new(VirtualPath::new(name)), text.into())
    }

    /// Like [`Source::from_string`], `None` when no file id is left for a new
    /// name.
    pub fn try_from_string(name: &str, text: impl Into<String>) -> Option<Self> {
        let id = FileId::try_new(VirtualPath::new(name))?;
        Some(Self::new(id, text.into()))
    }

    pub fn id(&self) -> FileId {
        self.0.id
    }

    pub fn text(&self) -> &str {
        &self.0.text
    }

    pub fn name(&self) -> String {
        self.0.id.path().display()
    }

    /// Byte offsets at which each line starts.
    pub fn line_starts(&self) -> &[usize] {
        &self.0.lines
    }

    /// The byte range of the zero-based line `index`, if it exists.
    pub fn line_range(&self, index: usize) -> Option<Range<usize>> {
        let start = *self.0.lines.get(index)?;
        let end = self
            .0
            .lines
            .get(index + 1)
            .copied()
            .unwrap_or(self.0.text.len());
        Some(start..end)
    }
}

impl Debug for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.0.id)
            .field("len", &self.0.text.len())
            .finish()
    }
}

impl AsRef<str> for Source {
    fn as_ref(&self) -> &str {
        self.text()
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id && self.0.text == other.0.text
    }
}
