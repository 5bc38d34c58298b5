use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use textpatch_tools::{expand_user, PatchConfig, DEFAULT_SAMPLE_BYTES};

/// Prefix for environment overrides, e.g. `TEXTPATCH_ALLOW_WRITE=false`.
const ENV_PREFIX: &str = "TEXTPATCH_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base directory for relative paths (supports $VAR, ${VAR}, ~)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Allow write, edit and multi-edit
    #[serde(default = "default_true")]
    pub allow_write: bool,

    /// Bytes sampled when classifying a file as text or binary
    #[serde(default = "default_sample_bytes")]
    pub sample_bytes: usize,

    /// Default log level when no flag is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_sample_bytes() -> usize {
    DEFAULT_SAMPLE_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None, // Relative paths resolve against $PWD
            allow_write: true,
            sample_bytes: DEFAULT_SAMPLE_BYTES,
            log_level: None,
        }
    }
}

/// Expand environment variables and home shorthand in a path string
/// Supports: $VAR, ${VAR}, ~, ~user
pub fn expand_path(path: &str) -> PathBuf {
    let re = regex::Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?").expect("valid pattern");
    let expanded = re.replace_all(path, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    });

    expand_user(&expanded)
}

impl Config {
    /// Defaults, then `config_file` when given, then `TEXTPATCH_*` variables.
    ///
    /// Runs before logging is installed, so it emits no events of its own.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Failed to load textpatch configuration")
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("textpatch").join("config.toml"))
    }

    /// Settings handed to the patch toolbox.
    pub fn patch_config(&self) -> PatchConfig {
        let mut config = PatchConfig::new()
            .with_write(self.allow_write)
            .with_sample_bytes(self.sample_bytes);
        if let Some(root) = &self.root {
            config = config.with_root(expand_path(root));
        }
        config
    }
}
