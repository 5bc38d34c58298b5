//! textpatch-core: Core types and traits for textpatch
//!
//! This crate provides the structured error type shared by every file
//! operation and the tool abstraction used to expose those operations to
//! agent frameworks.

pub mod blocking;
pub mod error;
pub mod tool;

pub use blocking::run_blocking;
pub use error::{Error, ErrorKind, IoAction};
pub use tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters, ToolRegistry};

pub type Result<T> = std::result::Result<T, Error>;
