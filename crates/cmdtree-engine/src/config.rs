use crate::error::{Error, Result};
use std::path::PathBuf;

/// Verbosity of the discovery pipeline's observational logging. Purely
/// observational: never alters control flow or error outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
}

pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".ts"];

/// Test files, test directories and declaration files are skipped unless
/// the caller supplies their own pattern list.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] =
    &["**/*.test.*", "**/*.spec.*", "**/__tests__", "**/*.d.ts"];

/// Configuration for one `discover_commands` run.
#[derive(Debug, Clone)]
pub struct DiscoverConfig {
    /// Roots to scan. Required, non-empty, absolute paths only.
    pub command_dirs: Vec<PathBuf>,
    /// File suffix allow-list; every entry must start with a dot.
    pub extensions: Vec<String>,
    /// Globs matched against paths relative to each scan root.
    pub ignore_patterns: Vec<String>,
    pub log_level: LogLevel,
    /// Enables the positional validator.
    pub validation: bool,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            command_dirs: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_level: LogLevel::default(),
            validation: true,
        }
    }
}

impl DiscoverConfig {
    pub fn new(command_dirs: Vec<PathBuf>) -> Self {
        Self {
            command_dirs,
            ..Self::default()
        }
    }

    /// Eager validation, run before any filesystem access. Errors list
    /// every offending entry, not just the first.
    pub fn validate(&self) -> Result<()> {
        if self.command_dirs.is_empty() {
            return Err(Error::Config(
                "command_dirs must not be empty".to_string(),
            ));
        }

        let relative: Vec<String> = self
            .command_dirs
            .iter()
            .filter(|dir| !dir.is_absolute())
            .map(|dir| dir.display().to_string())
            .collect();
        if !relative.is_empty() {
            return Err(Error::Config(format!(
                "command directories must be absolute paths: {}",
                relative.join(", ")
            )));
        }

        let bad_extensions: Vec<String> = self
            .extensions
            .iter()
            .filter(|ext| ext.is_empty() || !ext.starts_with('.'))
            .map(|ext| format!("{:?}", ext))
            .collect();
        if !bad_extensions.is_empty() {
            return Err(Error::Config(format!(
                "extensions must start with a dot: {}",
                bad_extensions.join(", ")
            )));
        }

        Ok(())
    }
}
