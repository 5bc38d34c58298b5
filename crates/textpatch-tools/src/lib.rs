//! textpatch-tools: Text file manipulation tools
//!
//! Read, write, find-and-replace and inspect text files on the local
//! filesystem. Every operation is available three ways:
//! - free functions (`patch_read`, `patch_write`, ...) returning a status string
//! - the [`Patch`] toolbox, with structured and string-returning methods
//! - agent [`Tool`](textpatch_core::Tool) implementations built by [`create_patch_tools`]

pub mod config;
pub mod edit;
pub mod fileops;
pub mod info;
pub mod path;
pub mod toolbox;
pub mod tools;

pub use config::{PatchConfig, DEFAULT_SAMPLE_BYTES};
pub use edit::{apply_edits, parse_edits, Applied, EditSpec, Replaced};
pub use fileops::Written;
pub use info::{Encoding, EntryType, FileInfo};
pub use path::{expand_user, resolve_path};
pub use toolbox::{
    patch_edit, patch_info, patch_multi_edit, patch_read, patch_write, render, Patch,
};
pub use tools::{
    create_patch_tools, create_patch_tools_arc, PatchEditTool, PatchInfoTool,
    PatchMultiEditTool, PatchReadTool, PatchWriteTool,
};
