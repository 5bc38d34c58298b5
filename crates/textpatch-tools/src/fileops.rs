//! Whole-file text reads and writes.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use textpatch_core::{Error, IoAction, Result};

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub path: PathBuf,
    /// Unicode scalar values written.
    pub chars: usize,
    pub bytes: usize,
}

impl fmt::Display for Written {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully wrote {} characters to {}",
            self.chars,
            self.path.display()
        )
    }
}

/// Read a regular file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| Error::io(IoAction::Read, path, e))?;
    let text = String::from_utf8(bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = text.len(), "Read file");
    Ok(text)
}

/// Replace a file's content, creating missing parent directories.
pub fn write_text(path: &Path, content: &str) -> Result<Written> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(IoAction::CreateDirs, path, e))?;
        }
    }

    store(path, content)?;

    let written = Written {
        path: path.to_path_buf(),
        chars: content.chars().count(),
        bytes: content.len(),
    };
    tracing::info!(path = %path.display(), bytes = written.bytes, "Wrote file");
    Ok(written)
}

/// Overwrite an existing file with its new full content.
pub(crate) fn store(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Write failed");
        Error::io(IoAction::Write, path, e)
    })
}
