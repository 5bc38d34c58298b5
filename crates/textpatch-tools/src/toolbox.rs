//! The `Patch` toolbox and the string-returning free functions.
//!
//! Each operation comes in two forms: a structured one returning
//! [`textpatch_core::Result`], and a `patch_*` one rendering that result as
//! the single status line agent callers expect (`"Successfully ..."` or
//! `"Error..."`).

use std::fmt::Display;

use serde_json::Value;

use textpatch_core::{Error, Result, ToolRegistry};

use crate::config::PatchConfig;
use crate::edit::{self, Applied, EditSpec, Replaced};
use crate::fileops::{self, Written};
use crate::info::{self, FileInfo};
use crate::tools::create_patch_tools;

/// Render an operation result as its caller-facing status string.
pub fn render<T: Display>(result: Result<T>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(err) => err.render(),
    }
}

/// Groups the file operations behind one configuration.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    config: PatchConfig,
}

impl Patch {
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Build a registry holding the tools this configuration allows.
    pub fn registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for tool in create_patch_tools(self.config.clone()) {
            registry.register(tool);
        }
        registry
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.config.allow_write {
            Ok(())
        } else {
            Err(Error::WriteDisabled)
        }
    }

    pub fn read(&self, path: &str) -> Result<String> {
        fileops::read_text(&self.config.resolve(path))
    }

    pub fn write(&self, path: &str, content: &str) -> Result<Written> {
        self.ensure_writable()?;
        fileops::write_text(&self.config.resolve(path), content)
    }

    pub fn edit(&self, path: &str, old: &str, new: &str, replace_all: bool) -> Result<Replaced> {
        self.ensure_writable()?;
        edit::edit_file(&self.config.resolve(path), old, new, replace_all)
    }

    /// Apply a serialized batch (a JSON array of `{old_string, new_string}`).
    pub fn multi_edit(&self, path: &str, edits: &str) -> Result<Applied> {
        self.ensure_writable()?;
        let edits = edit::parse_edits(edits)?;
        self.apply_edits(path, &edits)
    }

    /// Apply a batch given either as a JSON string or an inline array.
    pub fn multi_edit_value(&self, path: &str, edits: Value) -> Result<Applied> {
        match edits {
            Value::String(raw) => self.multi_edit(path, &raw),
            other => {
                self.ensure_writable()?;
                let edits = edit::edits_from_value(other)?;
                self.apply_edits(path, &edits)
            }
        }
    }

    pub fn apply_edits(&self, path: &str, edits: &[EditSpec]) -> Result<Applied> {
        self.ensure_writable()?;
        edit::multi_edit_file(&self.config.resolve(path), edits)
    }

    pub fn info(&self, path: &str) -> Result<FileInfo> {
        info::file_info(&self.config.resolve(path), self.config.sample_bytes)
    }

    pub fn patch_read(&self, path: &str) -> String {
        render(self.read(path))
    }

    pub fn patch_write(&self, path: &str, content: &str) -> String {
        render(self.write(path, content))
    }

    pub fn patch_edit(&self, path: &str, old: &str, new: &str, replace_all: bool) -> String {
        render(self.edit(path, old, new, replace_all))
    }

    pub fn patch_multi_edit(&self, path: &str, edits: &str) -> String {
        render(self.multi_edit(path, edits))
    }

    pub fn patch_info(&self, path: &str) -> String {
        render(self.info(path))
    }
}

/// Read a file's text, or an error line.
pub fn patch_read(path: &str) -> String {
    Patch::default().patch_read(path)
}

/// Write (overwrite) a file, creating parent directories.
pub fn patch_write(path: &str, content: &str) -> String {
    Patch::default().patch_write(path, content)
}

/// Replace `old` with `new`; multiple matches need `replace_all`.
pub fn patch_edit(path: &str, old: &str, new: &str, replace_all: bool) -> String {
    Patch::default().patch_edit(path, old, new, replace_all)
}

/// Apply a JSON edit batch all-or-nothing.
pub fn patch_multi_edit(path: &str, edits: &str) -> String {
    Patch::default().patch_multi_edit(path, edits)
}

/// Report size, type, readability and encoding.
pub fn patch_info(path: &str) -> String {
    Patch::default().patch_info(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_patch_read_existing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        std::fs::write(&file, "Hello, world!\nThis is a test file.").unwrap();

        assert_eq!(patch_read(&path_str(&file)), "Hello, world!\nThis is a test file.");
    }

    #[test]
    fn test_patch_read_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let result = patch_read(&path_str(&dir.path().join("nonexistent.txt")));
        assert!(result.starts_with("Error: File"));
        assert!(result.contains("does not exist"));
    }

    #[test]
    fn test_patch_read_directory() {
        let dir = TempDir::new().unwrap();
        let result = patch_read(&path_str(dir.path()));
        assert!(result.starts_with("Error:"));
        assert!(result.contains("is not a file"));
    }

    #[test]
    fn test_patch_write_new_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("new.txt");

        let result = patch_write(&path_str(&file), "New file content");
        assert!(result.starts_with("Successfully wrote"));
        assert!(result.contains("16"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "New file content");
    }

    #[test]
    fn test_patch_write_overwrite_existing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("existing.txt");
        std::fs::write(&file, "Original content").unwrap();

        let result = patch_write(&path_str(&file), "New content");
        assert!(result.starts_with("Successfully wrote"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "New content");
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = path_str(&dir.path().join("a").join("b").join("c.txt"));
        let content = "line one\nline two ✓\n";

        patch_write(&file, content);
        assert_eq!(patch_read(&file), content);
    }

    #[test]
    fn test_patch_edit_scenarios() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("edit.txt");
        std::fs::write(&file, "test test test").unwrap();
        let file = path_str(&file);

        let result = patch_edit(&file, "test", "replaced", false);
        assert!(result.contains("appears 3 times"));
        assert!(result.contains("Use replace_all=True"));
        assert_eq!(patch_read(&file), "test test test");

        let result = patch_edit(&file, "test", "replaced", true);
        assert!(result.starts_with("Successfully replaced 3 occurrence"));
        assert_eq!(patch_read(&file), "replaced replaced replaced");
    }

    #[test]
    fn test_patch_multi_edit_invalid_json() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("multi.txt");
        std::fs::write(&file, "content").unwrap();

        let result = patch_multi_edit(&path_str(&file), "invalid json");
        assert!(result.starts_with("Error: Invalid JSON format"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "content");
    }

    #[test]
    fn test_patch_multi_edit_empty_edits() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("multi.txt");
        std::fs::write(&file, "content").unwrap();

        assert_eq!(
            patch_multi_edit(&path_str(&file), "[]"),
            "Error: No edits provided"
        );
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "content");
    }

    #[test]
    fn test_patch_multi_edit_string_not_found() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("multi.txt");
        std::fs::write(&file, "hello world").unwrap();

        let edits = r#"[
            {"old_string": "world", "new_string": "universe"},
            {"old_string": "world", "new_string": "planet"}
        ]"#;
        let result = patch_multi_edit(&path_str(&file), edits);
        assert!(result.contains("Error in edit 2: String not found"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "hello world");
    }

    #[test]
    fn test_patch_info() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("info.txt");
        std::fs::write(&file, "Test content for info").unwrap();

        let result = patch_info(&path_str(&file));
        assert!(result.contains(&format!("File: {}", file.display())));
        assert!(result.contains("Size: 21 bytes"));
        assert!(result.contains("Type: File"));

        let missing = patch_info(&path_str(&dir.path().join("nonexistent.txt")));
        assert!(missing.starts_with("Error: Path"));
        assert!(missing.contains("does not exist"));
    }

    #[test]
    fn test_toolbox_methods() {
        let dir = TempDir::new().unwrap();
        let patch = Patch::default();

        let file = path_str(&dir.path().join("toolbox_multi.txt"));
        assert!(patch
            .patch_write(&file, "config = debug\nport = 8080")
            .starts_with("Successfully wrote"));

        let edits = r#"[
            {"old_string": "debug", "new_string": "production"},
            {"old_string": "8080", "new_string": "3000"}
        ]"#;
        let result = patch.patch_multi_edit(&file, edits);
        assert!(result.starts_with("Successfully applied 2 edit"));
        assert_eq!(patch.patch_read(&file), "config = production\nport = 3000");

        let result = patch.patch_edit(&file, "production", "testing", false);
        assert!(result.starts_with("Successfully replaced"));
        assert!(patch.patch_info(&file).contains("Type: File"));
    }

    #[test]
    fn test_relative_paths_use_root() {
        let dir = TempDir::new().unwrap();
        let patch = Patch::new(PatchConfig::new().with_root(dir.path()));

        let result = patch.patch_write("notes/today.txt", "remember");
        assert!(result.ends_with(&dir.path().join("notes/today.txt").display().to_string()));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes/today.txt")).unwrap(),
            "remember"
        );
        assert_eq!(patch.patch_read("notes/../notes/today.txt"), "remember");
    }

    #[test]
    fn test_read_only_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("locked.txt");
        std::fs::write(&file, "keep").unwrap();
        let patch = Patch::new(PatchConfig::new().with_write(false));
        let file = path_str(&file);

        assert_eq!(
            patch.patch_write(&file, "changed"),
            "Error: Write operations are disabled"
        );
        assert!(patch.patch_edit(&file, "keep", "x", false).starts_with("Error: Write"));
        assert!(patch.patch_multi_edit(&file, "[]").starts_with("Error: Write"));
        assert_eq!(patch.patch_read(&file), "keep");
    }

    #[test]
    fn test_multi_edit_value_inline_array() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("inline.txt");
        std::fs::write(&file, "alpha beta").unwrap();

        let applied = Patch::default()
            .multi_edit_value(
                &path_str(&file),
                serde_json::json!([{"old_string": "beta", "new_string": "gamma"}]),
            )
            .unwrap();
        assert_eq!(applied.edits, 1);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "alpha gamma");
    }

    #[test]
    fn test_unicode_content() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("unicode.txt");
        let content = "Hello 🌍! Testing unicode: café, naïve, résumé";
        std::fs::write(&file, content).unwrap();
        let file = path_str(&file);

        assert_eq!(patch_read(&file), content);
        assert!(patch_edit(&file, "🌍", "🌎", false).starts_with("Successfully replaced"));
        assert!(patch_read(&file).contains("Hello 🌎!"));
    }

    #[test]
    fn test_large_content() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("large.txt");
        let content: String = (0..1000).map(|i| format!("Line {}\n", i)).collect();
        std::fs::write(&file, &content).unwrap();
        let file = path_str(&file);

        assert_eq!(patch_read(&file).len(), content.len());
        assert!(patch_edit(&file, "Line 0", "Modified Line 0", false)
            .starts_with("Successfully replaced"));
    }

    #[test]
    fn test_empty_file_edit() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("empty.txt");
        std::fs::write(&file, "").unwrap();
        let file = path_str(&file);

        assert_eq!(patch_read(&file), "");
        assert!(patch_edit(&file, "nonexistent", "replacement", false).contains("String not found"));
    }
}
