//! In-memory virtual file store.
//!
//! The set of paths is fixed by the scenario seed: writes may change content
//! of existing, writable paths but never add or remove one.
use super::{LabError, LabFile};
use std::collections::BTreeMap;

/// Path -> content view handed to task checks.
pub type FileContents = BTreeMap<String, String>;

/// Presentation metadata kept beside the contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMeta {
    pub label: Option<String>,
    pub language: Option<String>,
    pub read_only: bool,
}

/// Borrowed view of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualFile<'a> {
    pub path: &'a str,
    pub content: &'a str,
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStore {
    contents: FileContents,
    meta: BTreeMap<String, FileMeta>,
}

impl FileStore {
    pub fn from_seeds(seeds: &[LabFile]) -> Self {
        let mut store = Self::default();
        store.initialize(seeds);
        store
    }

    /// Replace every file with its seed. Calling this twice with the same seeds
    /// leaves the store unchanged.
    pub fn initialize(&mut self, seeds: &[LabFile]) {
        self.contents.clear();
        self.meta.clear();
        for seed in seeds {
            self.contents
                .insert(seed.path.clone(), seed.initial_content.clone());
            self.meta.insert(
                seed.path.clone(),
                FileMeta {
                    label: seed.label.clone(),
                    language: seed.language.clone(),
                    read_only: seed.read_only,
                },
            );
        }
    }

    pub fn read(&self, path: &str) -> Result<&str, LabError> {
        self.contents
            .get(path)
            .map(String::as_str)
            .ok_or_else(|| LabError::NotFound(path.to_string()))
    }

    pub fn write(&mut self, path: &str, content: &str) -> Result<(), LabError> {
        if self.meta.get(path).is_some_and(|meta| meta.read_only) {
            return Err(LabError::ReadOnly(path.to_string()));
        }
        let slot = self
            .contents
            .get_mut(path)
            .ok_or_else(|| LabError::NotFound(path.to_string()))?;
        content.clone_into(slot);
        Ok(())
    }

    /// Paths in sorted order.
    pub fn list(&self) -> Vec<&str> {
        self.contents.keys().map(String::as_str).collect()
    }

    pub fn file(&self, path: &str) -> Option<VirtualFile<'_>> {
        let (path, content) = self.contents.get_key_value(path)?;
        Some(VirtualFile {
            path,
            content,
            read_only: self.is_read_only(path),
        })
    }

    pub fn meta(&self, path: &str) -> Option<&FileMeta> {
        self.meta.get(path)
    }

    pub fn is_read_only(&self, path: &str) -> bool {
        self.meta.get(path).is_some_and(|meta| meta.read_only)
    }

    pub fn contents(&self) -> &FileContents {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
