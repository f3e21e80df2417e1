use crate::args::{Cli, LogLevelArg};
use crate::config::{FileConfig, expand_home};
use crate::modules;
use anyhow::{Result, bail};
use cmdtree_engine::{CommandSet, DiscoverConfig, LogLevel, discover_commands};
use std::path::PathBuf;

pub async fn run(cli: Cli) -> Result<()> {
    let config = build_discover_config(&cli)?;
    let loader = modules::demo_registry();

    let modules = discover_commands(&config, &loader).await?;
    let set = CommandSet::new(modules);
    let root = set.build_cli("cmdtree").await?;

    let mut argv = vec!["cmdtree".to_string()];
    argv.extend(cli.rest.iter().cloned());
    let matches = match root.try_get_matches_from(argv) {
        Ok(matches) => matches,
        // clap handles help/version/usage output itself.
        Err(err) => err.exit(),
    };

    set.dispatch(&matches).await
}

/// Merge flags over the optional config file. Flags win wholesale per
/// field; relative directories are anchored to the current working dir.
fn build_discover_config(cli: &Cli) -> Result<DiscoverConfig> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let dirs: Vec<PathBuf> = if cli.commands_dirs.is_empty() {
        file.command_dirs.iter().map(|dir| expand_home(dir)).collect()
    } else {
        cli.commands_dirs.clone()
    };
    if dirs.is_empty() {
        bail!("no command directory given; pass --commands-dir or set command_dirs in the config file");
    }
    let dirs = dirs
        .into_iter()
        .map(|dir| {
            if dir.is_absolute() {
                Ok(dir)
            } else {
                std::path::absolute(&dir)
                    .map_err(|e| anyhow::anyhow!("cannot resolve {}: {e}", dir.display()))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let mut config = DiscoverConfig::new(dirs);
    if let Some(extensions) = pick(&cli.extensions, file.extensions) {
        config.extensions = extensions;
    }
    if let Some(patterns) = pick(&cli.ignore_patterns, file.ignore_patterns) {
        config.ignore_patterns = patterns;
    }
    config.log_level = match cli.log_level {
        LogLevelArg::Info => LogLevel::Info,
        LogLevelArg::Debug => LogLevel::Debug,
    };
    config.validation = !cli.no_validation;
    Ok(config)
}

fn pick(flags: &[String], file: Option<Vec<String>>) -> Option<Vec<String>> {
    if !flags.is_empty() {
        Some(flags.to_vec())
    } else {
        file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cmdtree.toml");
        fs::write(
            &path,
            "command_dirs = [\"/from/file\"]\nextensions = [\".js\"]\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "cmdtree",
            "--config",
            path.to_str().unwrap(),
            "--commands-dir",
            "/from/flag",
            "--extension",
            ".ts",
        ]);
        let config = build_discover_config(&cli).unwrap();
        assert_eq!(config.command_dirs, [PathBuf::from("/from/flag")]);
        assert_eq!(config.extensions, [".ts"]);
    }

    #[test]
    fn test_config_file_fills_unset_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cmdtree.toml");
        fs::write(&path, "command_dirs = [\"/from/file\"]\n").unwrap();

        let cli = Cli::parse_from(["cmdtree", "--config", path.to_str().unwrap()]);
        let config = build_discover_config(&cli).unwrap();
        assert_eq!(config.command_dirs, [PathBuf::from("/from/file")]);
        assert_eq!(config.extensions, [".js", ".ts"]);
        assert!(config.validation);
    }

    #[test]
    fn test_no_directories_anywhere_is_an_error() {
        let cli = Cli::parse_from(["cmdtree"]);
        let err = build_discover_config(&cli).unwrap_err();
        assert!(err.to_string().contains("--commands-dir"));
    }

    #[test]
    fn test_relative_directory_is_anchored() {
        let cli = Cli::parse_from(["cmdtree", "--commands-dir", "commands"]);
        let config = build_discover_config(&cli).unwrap();
        assert!(config.command_dirs[0].is_absolute());
        assert!(config.command_dirs[0].ends_with("commands"));
    }

    #[test]
    fn test_no_validation_flag_disables_validator() {
        let cli = Cli::parse_from(["cmdtree", "--commands-dir", "/c", "--no-validation"]);
        let config = build_discover_config(&cli).unwrap();
        assert!(!config.validation);
    }
}
