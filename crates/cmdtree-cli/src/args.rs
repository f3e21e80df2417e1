use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cmdtree")]
#[command(about = "Discover file-defined commands and run them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory to discover commands in; repeat for multiple roots
    #[arg(long = "commands-dir")]
    pub commands_dirs: Vec<PathBuf>,

    /// File suffix allow-list entry (with leading dot); repeatable
    #[arg(long = "extension")]
    pub extensions: Vec<String>,

    /// Ignore glob, relative to each commands dir; repeatable, replaces
    /// the built-in test-file defaults
    #[arg(long = "ignore")]
    pub ignore_patterns: Vec<String>,

    /// TOML config file supplying defaults for the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevelArg,

    /// Skip positional-argument consistency checks
    #[arg(long)]
    pub no_validation: bool,

    /// Arguments forwarded to the discovered command tree
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevelArg {
    Info,
    Debug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_discovery_flags() {
        let cli = Cli::parse_from([
            "cmdtree",
            "--commands-dir",
            "/commands",
            "--extension",
            ".ts",
            "--log-level",
            "debug",
            "--",
            "db",
            "health",
        ]);
        assert_eq!(cli.commands_dirs, [PathBuf::from("/commands")]);
        assert_eq!(cli.extensions, [".ts"]);
        assert_eq!(cli.log_level, LogLevelArg::Debug);
        assert_eq!(cli.rest, ["db", "health"]);
    }

    #[test]
    fn test_forwarded_args_may_contain_flags() {
        let cli = Cli::parse_from(["cmdtree", "db", "migration", "--target", "42"]);
        assert_eq!(cli.rest, ["db", "migration", "--target", "42"]);
    }
}
