use std::collections::HashMap;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::num::NonZeroU16;
use std::path::PathBuf;
use std::sync::{LazyLock, RwLock};

static INTERNER: LazyLock<RwLock<FileInterner>> = LazyLock::new(|| {
    RwLock::new(FileInterner {
        from_id: Vec::new(),
        to_id: HashMap::new(),
    })
});

struct FileInterner {
    from_id: Vec<FileRef>,
    to_id: HashMap<FileRef, FileId>,
}

type FileRef = &'static VirtualPath;

/// A path in the virtual file system that templates and generated sources live in.
///
/// Templates compiled from strings get names like `<template>`, files read by the
/// CLI keep their path on disk.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtualPath(pub PathBuf);

impl<T> From<T> for VirtualPath
where
    T: Into<PathBuf>,
{
    fn from(value: T) -> Self {
        Self(value.into())
    }
}

impl VirtualPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn display(&self) -> String {
        self.0.display().to_string()
    }
}

impl Debug for VirtualPath {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0.display(), f)
    }
}

/// Identifier for a file,
///
/// Globally interned and thus cheap to copy, compare, and hash. Interning the
/// same path twice yields the same id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FileId(NonZeroU16);

impl FileId {
    #[track_caller]
    pub fn new(path: impl Into<VirtualPath>) -> Self {
        Self::try_new(path).expect("out of file ids")
    }

    /// Like [`FileId::new`], but returns `None` once every id is taken
    /// instead of panicking.
    pub fn try_new(path: impl Into<VirtualPath>) -> Option<Self> {
        let path = path.into();
        let mut interner = INTERNER.write().unwrap_or_else(|e| e.into_inner());
        if let Some(&id) = interner.to_id.get(&path) {
            return Some(id);
        }

        let num = u16::try_from(interner.from_id.len() + 1)
            .ok()
            .and_then(NonZeroU16::new)?;

        let id = FileId(num);
        let leaked = Box::leak(Box::new(path));
        interner.to_id.insert(leaked, id);
        interner.from_id.push(leaked);
        Some(id)
    }

    #[track_caller]
    pub fn path(&self) -> &'static VirtualPath {
        self.try_path().expect("file id not interned")
    }

    pub fn try_path(&self) -> Option<&'static VirtualPath> {
        let interner = INTERNER.read().ok()?;
        let id = usize::from(self.0.get() - 1);

        interner.from_id.get(id).copied()
    }

    pub(crate) const fn into_raw(self) -> NonZeroU16 {
        self.0
    }

    pub(crate) const fn from_raw(raw: NonZeroU16) -> Self {
        Self(raw)
    }
}

impl Debug for FileId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let path = self
            .try_path()
            .map(|p| format!("{:?}", p))
            .unwrap_or_else(|| String::from("not interned"));
        write!(f, "FileId({id}, {path})", id = self.0.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = FileId::new("<interning>");
        let b = FileId::new("<interning>");
        assert_eq!(a, b);
        assert_eq!(a.path().display(), "<interning>");
        assert_eq!(FileId::try_new("<interning>"), Some(a));
    }

    #[test]
    fn distinct_paths_get_distinct_ids() {
        assert_ne!(FileId::new("a.dot"), FileId::new("b.dot"));
    }
}
