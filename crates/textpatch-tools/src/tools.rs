//! Agent tools wrapping the patch operations.
//!
//! Operation failures come back as `ToolOutput::error` carrying the same
//! status line the free functions return; `Err` is reserved for arguments
//! that do not deserialize.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use textpatch_core::{
    run_blocking, Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters,
};

use crate::config::PatchConfig;
use crate::toolbox::Patch;

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, Error> {
    serde_json::from_value(arguments).map_err(|e| Error::invalid_arguments(tool, e.to_string()))
}

// =============================================================================
// Read Tool
// =============================================================================

pub struct PatchReadTool {
    patch: Patch,
}

impl PatchReadTool {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            patch: Patch::new(config),
        }
    }
}

#[derive(Deserialize)]
struct ReadArgs {
    path: String,
}

#[async_trait]
impl Tool for PatchReadTool {
    fn name(&self) -> &str {
        "patch_read"
    }

    fn description(&self) -> &str {
        "Read the complete contents of a text file."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "path",
                PropertySchema::string("Path to the file to read (supports ~)"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        let args: ReadArgs = parse_args(self.name(), arguments)?;
        let patch = self.patch.clone();
        let result = run_blocking(move || patch.read(&args.path)).await?;
        Ok(ToolOutput::from_result(result))
    }
}

// =============================================================================
// Write Tool
// =============================================================================

pub struct PatchWriteTool {
    patch: Patch,
}

impl PatchWriteTool {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            patch: Patch::new(config),
        }
    }
}

#[derive(Deserialize)]
struct WriteArgs {
    path: String,
    content: String,
}

#[async_trait]
impl Tool for PatchWriteTool {
    fn name(&self) -> &str {
        "patch_write"
    }

    fn description(&self) -> &str {
        "Write content to a file. Creates the file and any missing parent directories, overwrites it if it exists."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("path", PropertySchema::string("Path to the file to write"), true)
                .add_property("content", PropertySchema::string("Full content of the file"), true),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        let args: WriteArgs = parse_args(self.name(), arguments)?;
        let patch = self.patch.clone();
        let result = run_blocking(move || patch.write(&args.path, &args.content)).await?;
        Ok(ToolOutput::from_result(result))
    }
}

// =============================================================================
// Edit Tool
// =============================================================================

pub struct PatchEditTool {
    patch: Patch,
}

impl PatchEditTool {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            patch: Patch::new(config),
        }
    }
}

#[derive(Deserialize)]
struct EditArgs {
    path: String,
    old_string: String,
    new_string: String,
    #[serde(default)]
    replace_all: bool,
}

#[async_trait]
impl Tool for PatchEditTool {
    fn name(&self) -> &str {
        "patch_edit"
    }

    fn description(&self) -> &str {
        "Replace an exact string in a file. Fails if the string is missing, or appears more than once unless replace_all is set."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("path", PropertySchema::string("Path to the file to edit"), true)
                .add_property(
                    "old_string",
                    PropertySchema::string("Exact text to find (case-sensitive)"),
                    true,
                )
                .add_property("new_string", PropertySchema::string("Replacement text"), true)
                .add_property(
                    "replace_all",
                    PropertySchema::boolean("Replace every occurrence instead of requiring a unique match")
                        .with_default(Value::Bool(false)),
                    false,
                ),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        let args: EditArgs = parse_args(self.name(), arguments)?;
        let patch = self.patch.clone();
        let result = run_blocking(move || {
            patch.edit(&args.path, &args.old_string, &args.new_string, args.replace_all)
        })
        .await?;
        Ok(ToolOutput::from_result(result))
    }
}

// =============================================================================
// Multi-Edit Tool
// =============================================================================

pub struct PatchMultiEditTool {
    patch: Patch,
}

impl PatchMultiEditTool {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            patch: Patch::new(config),
        }
    }
}

#[derive(Deserialize)]
struct MultiEditArgs {
    path: String,
    /// JSON string or inline array of `{old_string, new_string}`.
    edits: Value,
}

#[async_trait]
impl Tool for PatchMultiEditTool {
    fn name(&self) -> &str {
        "patch_multi_edit"
    }

    fn description(&self) -> &str {
        "Apply several find-and-replace edits to one file in order. Each edit replaces all of its matches and sees the result of the previous edits; if any edit fails, the file is left unchanged."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("path", PropertySchema::string("Path to the file to edit"), true)
                .add_property(
                    "edits",
                    PropertySchema::string(
                        "Edits to apply in order: an array of {old_string, new_string} objects, \
                         passed either as a JSON-encoded string or as the array itself",
                    ),
                    true,
                ),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        let args: MultiEditArgs = parse_args(self.name(), arguments)?;
        let patch = self.patch.clone();
        let result = run_blocking(move || patch.multi_edit_value(&args.path, args.edits)).await?;
        Ok(ToolOutput::from_result(result))
    }
}

// =============================================================================
// Info Tool
// =============================================================================

pub struct PatchInfoTool {
    patch: Patch,
}

impl PatchInfoTool {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            patch: Patch::new(config),
        }
    }
}

#[async_trait]
impl Tool for PatchInfoTool {
    fn name(&self) -> &str {
        "patch_info"
    }

    fn description(&self) -> &str {
        "Show a file's size, type, readability and whether it holds text or binary data."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "path",
                PropertySchema::string("Path to the file or directory"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        let args: ReadArgs = parse_args(self.name(), arguments)?;
        let patch = self.patch.clone();
        let result = run_blocking(move || patch.info(&args.path)).await?;
        Ok(ToolOutput::from_result(result))
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Create the patch tools for `config`; mutating tools only when writes are allowed.
pub fn create_patch_tools(config: PatchConfig) -> Vec<Box<dyn Tool>> {
    let mut tools: Vec<Box<dyn Tool>> = vec![
        Box::new(PatchReadTool::new(config.clone())),
        Box::new(PatchInfoTool::new(config.clone())),
    ];

    if config.allow_write {
        tools.push(Box::new(PatchWriteTool::new(config.clone())));
        tools.push(Box::new(PatchEditTool::new(config.clone())));
        tools.push(Box::new(PatchMultiEditTool::new(config)));
    }

    tools
}

/// Same tool set as [`create_patch_tools`], shareable across tasks.
pub fn create_patch_tools_arc(config: PatchConfig) -> Vec<Arc<dyn Tool>> {
    let mut tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(PatchReadTool::new(config.clone())),
        Arc::new(PatchInfoTool::new(config.clone())),
    ];

    if config.allow_write {
        tools.push(Arc::new(PatchWriteTool::new(config.clone())));
        tools.push(Arc::new(PatchEditTool::new(config.clone())));
        tools.push(Arc::new(PatchMultiEditTool::new(config)));
    }

    tools
}
