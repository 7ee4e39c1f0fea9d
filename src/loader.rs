//! Loads referenced svg files from disk.

use std::path::{Path, PathBuf};

use crate::error::InlineError;

/// Resolves `src` values to files and reads them as text.
///
/// Without a root, relative paths resolve against the process working directory.
#[derive(Debug, Clone, Default)]
pub struct ContentLoader {
    root: Option<PathBuf>,
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` instead of the working directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Filesystem location of `src`. Absolute paths are kept as-is.
    pub fn resolve(&self, src: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(src),
            None => PathBuf::from(src),
        }
    }

    /// Read the whole file behind `src`.
    pub async fn load(&self, src: &str) -> Result<String, InlineError> {
        let path = self.resolve(src);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| InlineError::Read { path, source })
    }
}
