use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Filesystem step that failed inside an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
    CreateDirs,
}

impl fmt::Display for IoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoAction::Read => write!(f, "read"),
            IoAction::Write => write!(f, "write"),
            IoAction::CreateDirs => write!(f, "create directories for"),
        }
    }
}

/// Machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Target path does not exist.
    NotFound,
    /// Path exists but is not a regular file.
    WrongType,
    /// Search string occurs more than once and replace-all was not requested.
    NotUnique,
    /// Search string occurs zero times.
    StringNotFound,
    /// Edit batch failed to parse or is empty.
    MalformedBatch,
    /// Underlying filesystem or decode failure.
    Io,
    /// Mutating operation attempted on a read-only configuration.
    Disabled,
    /// Tool arguments could not be deserialized.
    InvalidArguments,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("File '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("Path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("'{}' is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("String not found: '{0}'")]
    StringNotFound(String),

    #[error(
        "String '{needle}' appears {count} times. Use replace_all=True to replace all occurrences, \
         or provide more context to make the string unique."
    )]
    NotUnique { needle: String, count: usize },

    #[error("Invalid JSON format for edits: {0}")]
    InvalidJson(String),

    #[error("Invalid edit format: {0}")]
    InvalidEdits(String),

    #[error("No edits provided")]
    NoEdits,

    /// A multi-edit step failed; `index` is 1-based.
    #[error("edit {index}: {source}")]
    EditStep { index: usize, source: Box<Error> },

    #[error("Write operations are disabled")]
    WriteDisabled,

    #[error("Could not {action} '{}': {source}", .path.display())]
    Io {
        action: IoAction,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not decode '{}' as UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Tool error: {tool} - {message}")]
    Tool { tool: String, message: String },
}

impl Error {
    pub fn io(action: IoAction, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn edit_step(index: usize, source: Error) -> Self {
        Self::EditStep {
            index,
            source: Box::new(source),
        }
    }

    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound(_) | Error::PathNotFound(_) => ErrorKind::NotFound,
            Error::NotAFile(_) => ErrorKind::WrongType,
            Error::StringNotFound(_) => ErrorKind::StringNotFound,
            Error::NotUnique { .. } => ErrorKind::NotUnique,
            Error::InvalidJson(_) | Error::InvalidEdits(_) | Error::NoEdits => {
                ErrorKind::MalformedBatch
            }
            Error::EditStep { source, .. } => source.kind(),
            Error::WriteDisabled => ErrorKind::Disabled,
            Error::Io { .. } | Error::Decode { .. } | Error::Tool { .. } => ErrorKind::Io,
            Error::InvalidArguments { .. } => ErrorKind::InvalidArguments,
        }
    }

    /// Render the caller-facing status line.
    ///
    /// Every rendering starts with `Error`, so callers can tell failures
    /// from `Successfully ...` messages by prefix alone.
    pub fn render(&self) -> String {
        match self {
            Error::EditStep { index, source } => format!("Error in edit {}: {}", index, source),
            other => format!("Error: {}", other),
        }
    }
}
