use crate::diag::{FileError, FileResult};
use dot_syntax::{FileId, Source};
use std::collections::HashMap;

/// Gives diagnostics access to the text their spans point into.
pub trait World {
    fn source(&self, file_id: FileId) -> FileResult<Source>;
}

/// A plain collection of sources, keyed by their file id.
#[derive(Debug, Default, Clone)]
pub struct SourceMap {
    files: HashMap<FileId, Source>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: Source) {
        self.files.insert(source.id(), source);
    }

    pub fn with(mut self, source: Source) -> Self {
        self.insert(source);
        self
    }
}

impl World for SourceMap {
    fn source(&self, file_id: FileId) -> FileResult<Source> {
        self.files
            .get(&file_id)
            .cloned()
            .ok_or_else(|| FileError::NotFound(file_id.path().0.clone()))
    }
}
