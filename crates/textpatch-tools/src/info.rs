//! Metadata reports for files and directories.

use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind as IoErrorKind, Read};
use std::path::{Path, PathBuf};

use textpatch_core::{Error, IoAction, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    Other,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::File => write!(f, "File"),
            EntryType::Directory => write!(f, "Directory"),
            EntryType::Other => write!(f, "Other"),
        }
    }
}

/// Best-effort guess at how a file's bytes should be treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    Text,
    /// Not valid UTF-8; `mime` is set when the signature is recognized.
    Binary { mime: Option<String> },
    /// Directories and files that could not be opened.
    NotApplicable,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Text => write!(f, "Text"),
            Encoding::Binary { mime: Some(mime) } => write!(f, "Binary ({})", mime),
            Encoding::Binary { mime: None } => write!(f, "Binary"),
            Encoding::NotApplicable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub entry_type: EntryType,
    pub readable: bool,
    pub encoding: Encoding,
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.path.display())?;
        writeln!(f, "Size: {} bytes", self.size)?;
        writeln!(f, "Type: {}", self.entry_type)?;
        writeln!(f, "Readable: {}", if self.readable { "True" } else { "False" })?;
        write!(f, "Encoding: {}", self.encoding)
    }
}

/// Classify a prefix sample of a file.
///
/// `truncated` means the sample stopped short of the end of the file, in
/// which case a multi-byte character cut off at the edge still counts as
/// text.
pub fn classify(sample: &[u8], truncated: bool) -> Encoding {
    match std::str::from_utf8(sample) {
        Ok(_) => Encoding::Text,
        Err(e) if truncated && e.error_len().is_none() => Encoding::Text,
        Err(_) => Encoding::Binary {
            mime: infer::get(sample).map(|kind| kind.mime_type().to_string()),
        },
    }
}

/// Gather a metadata report for `path`.
pub fn file_info(path: &Path, sample_bytes: usize) -> Result<FileInfo> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(Error::io(IoAction::Read, path, e)),
    };

    let (entry_type, readable, encoding) = if metadata.is_file() {
        match sample(path, sample_bytes) {
            Some((bytes, truncated)) => (EntryType::File, true, classify(&bytes, truncated)),
            None => (EntryType::File, false, Encoding::NotApplicable),
        }
    } else if metadata.is_dir() {
        let readable = fs::read_dir(path).is_ok();
        (EntryType::Directory, readable, Encoding::NotApplicable)
    } else {
        let readable = File::open(path).is_ok();
        (EntryType::Other, readable, Encoding::NotApplicable)
    };

    let info = FileInfo {
        path: path.to_path_buf(),
        size: metadata.len(),
        entry_type,
        readable,
        encoding,
    };
    tracing::debug!(path = %path.display(), size = info.size, kind = %info.entry_type, "Collected file info");
    Ok(info)
}

/// Read up to `limit` bytes; `None` when the file cannot be read.
fn sample(path: &Path, limit: usize) -> Option<(Vec<u8>, bool)> {
    let file = File::open(path).ok()?;
    let mut buf = Vec::with_capacity(limit.min(64 * 1024));
    // One extra byte tells us whether the sample was cut short.
    file.take((limit as u64).saturating_add(1))
        .read_to_end(&mut buf)
        .ok()?;
    let truncated = buf.len() > limit;
    buf.truncate(limit);
    Some((buf, truncated))
}
