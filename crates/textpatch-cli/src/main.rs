use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use textpatch_core::ToolOutput;
use textpatch_tools::Patch;

mod config;

use config::Config;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose: path resolution for every call
    Trace,
    /// Verbose: reads, info reports, config loading
    Debug,
    /// Standard: every successful write and edit
    Info,
    /// Quiet: only rejected batches and failed writes
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser)]
#[command(name = "textpatch")]
#[command(author, version, about = "Read, write and patch text files", long_about = None)]
pub struct Cli {
    /// Base directory for relative paths (overrides config)
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Refuse write, edit and multi-edit
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Enable debug logging (shorthand for --log-level debug)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Write logs to file (JSON-lines format)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a file's contents
    Read { path: String },
    /// Write a file, creating parent directories
    Write {
        path: String,
        /// Content to write (read from stdin when omitted)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Replace a string in a file
    Edit {
        path: String,
        old_string: String,
        new_string: String,
        /// Replace every occurrence
        #[arg(long)]
        replace_all: bool,
    },
    /// Apply a JSON array of {old_string, new_string} edits in order
    MultiEdit {
        path: String,
        /// Edits as JSON (read from stdin when omitted)
        edits: Option<String>,
    },
    /// Show size, type, readability and encoding
    Info { path: String },
    /// Call a tool by name with JSON arguments
    Call {
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },
    /// Print tool definitions as JSON
    Tools,
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_file = Config::config_path().ok();
    let mut config = Config::load_from(config_file.as_deref())?;
    if let Some(root) = &cli.root {
        config.root = Some(root.clone());
    }
    if cli.read_only {
        config.allow_write = false;
    }

    // Resolve log level: --debug > --log-level > config > warn
    let log_level = if cli.debug {
        LogLevel::Debug
    } else if let Some(level) = cli.log_level {
        level
    } else if let Some(level) = &config.log_level {
        LogLevel::from_str(level, true)
            .map_err(|e| anyhow::anyhow!("Invalid log_level '{}' in config: {}", level, e))?
    } else {
        LogLevel::Warn
    };
    init_logging(log_level, cli.log_file.as_deref())?;
    log_config(&config, config_file.as_deref());

    let patch = Patch::new(config.patch_config());
    let report = run(cli.command, &patch, &config).await?;

    println!("{}", report.content);
    if report.is_error {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(level: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::new(level.as_filter());

    if let Some(log_path) = log_file {
        // Log file specified: write JSON to file
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file: {:?}", log_path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::sync::Mutex::new(file)))
            .init();
    } else {
        // Keep stdout clean for command output
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn log_config(config: &Config, config_file: Option<&Path>) {
    match config_file {
        Some(path) => tracing::debug!(
            path = %path.display(),
            exists = path.exists(),
            root = ?config.root,
            allow_write = config.allow_write,
            "Loaded configuration"
        ),
        None => tracing::debug!(
            root = ?config.root,
            allow_write = config.allow_write,
            "Loaded configuration without a config file"
        ),
    }
}

async fn run(command: Commands, patch: &Patch, config: &Config) -> Result<ToolOutput> {
    let report = match command {
        Commands::Read { path } => ToolOutput::from_result(patch.read(&path)),
        Commands::Write { path, content } => {
            let content = match content {
                Some(content) => content,
                None => read_stdin()?,
            };
            ToolOutput::from_result(patch.write(&path, &content))
        }
        Commands::Edit {
            path,
            old_string,
            new_string,
            replace_all,
        } => ToolOutput::from_result(patch.edit(&path, &old_string, &new_string, replace_all)),
        Commands::MultiEdit { path, edits } => {
            let edits = match edits {
                Some(edits) => edits,
                None => read_stdin()?,
            };
            ToolOutput::from_result(patch.multi_edit(&path, &edits))
        }
        Commands::Info { path } => ToolOutput::from_result(patch.info(&path)),
        Commands::Call { tool, arguments } => {
            let arguments: serde_json::Value = serde_json::from_str(&arguments)
                .with_context(|| format!("Tool arguments are not valid JSON: {}", arguments))?;
            match patch.registry().execute(&tool, arguments).await {
                Ok(output) => output,
                Err(err) => ToolOutput::error(err.render()),
            }
        }
        Commands::Tools => {
            let definitions = patch.registry().definitions();
            ToolOutput::success(serde_json::to_string_pretty(&definitions)?)
        }
        Commands::Config => {
            let path = Config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(unknown)".to_string());
            let body = toml::to_string_pretty(config).context("Failed to render configuration")?;
            ToolOutput::success(format!("# {}\n{}", path, body))
        }
    };
    Ok(report)
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_command() {
        let cli = Cli::try_parse_from([
            "textpatch",
            "edit",
            "notes.txt",
            "old",
            "new",
            "--replace-all",
            "--read-only",
        ])
        .unwrap();

        assert!(cli.read_only);
        match cli.command {
            Commands::Edit {
                path,
                old_string,
                new_string,
                replace_all,
            } => {
                assert_eq!(path, "notes.txt");
                assert_eq!(old_string, "old");
                assert_eq!(new_string, "new");
                assert!(replace_all);
            }
            _ => panic!("expected edit command"),
        }
    }

    #[test]
    fn test_parse_log_level() {
        let cli = Cli::try_parse_from(["textpatch", "--log-level", "info", "tools"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Info));
        assert_eq!(LogLevel::Info.as_filter(), "info");
    }

    #[derive(Clone, Default)]
    struct Capture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_event_reaches_installed_subscriber() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "allow_write = false\n").unwrap();
        let config = Config::load_from(Some(&path)).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            log_config(&config, Some(&path));
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Loaded configuration"));
        assert!(output.contains("allow_write=false"));
    }

    #[tokio::test]
    async fn test_run_edit_and_read() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello world").unwrap();
        let config = Config {
            root: Some(dir.path().display().to_string()),
            ..Config::default()
        };
        let patch = Patch::new(config.patch_config());

        let edit = Commands::Edit {
            path: "a.txt".to_string(),
            old_string: "world".to_string(),
            new_string: "there".to_string(),
            replace_all: false,
        };
        let report = run(edit, &patch, &config).await.unwrap();
        assert!(!report.is_error);
        assert!(report.content.starts_with("Successfully replaced 1 occurrence"));

        let read = Commands::Read {
            path: "a.txt".to_string(),
        };
        let report = run(read, &patch, &config).await.unwrap();
        assert_eq!(report.content, "hello there");
    }

    #[tokio::test]
    async fn test_run_reports_errors() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            root: Some(dir.path().display().to_string()),
            ..Config::default()
        };
        let patch = Patch::new(config.patch_config());

        let report = run(
            Commands::Info {
                path: "missing".to_string(),
            },
            &patch,
            &config,
        )
        .await
        .unwrap();
        assert!(report.is_error);
        assert!(report.content.starts_with("Error: Path"));
    }

    #[tokio::test]
    async fn test_run_call_dispatches_tool() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            root: Some(dir.path().display().to_string()),
            ..Config::default()
        };
        let patch = Patch::new(config.patch_config());

        let call = Commands::Call {
            tool: "patch_write".to_string(),
            arguments: r#"{"path": "out/new.txt", "content": "abc"}"#.to_string(),
        };
        let report = run(call, &patch, &config).await.unwrap();
        assert!(report.content.starts_with("Successfully wrote 3 characters"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out/new.txt")).unwrap(),
            "abc"
        );

        let unknown = Commands::Call {
            tool: "no_such_tool".to_string(),
            arguments: "{}".to_string(),
        };
        let report = run(unknown, &patch, &config).await.unwrap();
        assert!(report.is_error);
    }

    #[tokio::test]
    async fn test_run_tools_lists_definitions() {
        let config = Config {
            allow_write: false,
            ..Config::default()
        };
        let patch = Patch::new(config.patch_config());

        let report = run(Commands::Tools, &patch, &config).await.unwrap();
        let definitions: serde_json::Value = serde_json::from_str(&report.content).unwrap();
        let names: Vec<&str> = definitions
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["patch_info", "patch_read"]);
    }
}
