use std::path::{Path, PathBuf};

use crate::path::resolve_path;

/// Bytes sampled from the start of a file to classify its encoding.
pub const DEFAULT_SAMPLE_BYTES: usize = 8192;

/// Settings shared by every patch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// Base directory for relative paths; the working directory when unset.
    pub root: Option<PathBuf>,
    pub allow_write: bool,
    pub sample_bytes: usize,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            root: None,
            allow_write: true,
            sample_bytes: DEFAULT_SAMPLE_BYTES,
        }
    }
}

impl PatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_write(mut self, allow: bool) -> Self {
        self.allow_write = allow;
        self
    }

    pub fn with_sample_bytes(mut self, bytes: usize) -> Self {
        self.sample_bytes = bytes.max(1);
        self
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve_path(path, self.root.as_deref())
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
