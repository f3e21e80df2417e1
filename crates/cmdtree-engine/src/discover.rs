use crate::compile::{CommandModule, compile};
use crate::config::DiscoverConfig;
use crate::error::{Error, Result};
use crate::loader::ModuleLoader;
use crate::resolve::resolve;
use crate::scan::{ScanFilter, scan_dir_async};
use crate::segment::{drop_extension_token, segment};
use crate::tree::{FileCommand, build_forest};
use crate::validate::validate_positionals;
use futures::future;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run the whole discovery pipeline: scan, resolve, validate, build the
/// segment tree and compile it into ready-to-register command modules.
///
/// Scans and per-file resolutions run concurrently purely for latency;
/// results are collected back into scan order before any tree mutation,
/// so sibling ordering stays deterministic across runs. Fail-fast: the
/// first error aborts the pipeline and no partial tree is produced.
pub async fn discover_commands(
    config: &DiscoverConfig,
    loader: &dyn ModuleLoader,
) -> Result<Vec<CommandModule>> {
    config.validate()?;
    let filter = ScanFilter::new(&config.extensions, &config.ignore_patterns)?;

    let scans = config
        .command_dirs
        .iter()
        .map(|dir| scan_dir_async(dir.clone(), filter.clone()));
    let scanned = future::try_join_all(scans).await?;

    // (scan root, file) pairs, flattened in configured-directory order.
    let mut files: Vec<(PathBuf, PathBuf)> = Vec::new();
    for (dir, paths) in config.command_dirs.iter().zip(scanned) {
        for path in paths {
            files.push((dir.clone(), path));
        }
    }
    if files.is_empty() {
        return Err(Error::NoCommands {
            dirs: config.command_dirs.clone(),
        });
    }
    debug!(files = files.len(), "discovered command files");

    let resolutions = files
        .iter()
        .map(|(base, path)| resolve_file(base, path, config, loader));
    let commands = future::try_join_all(resolutions).await?;

    let forest = build_forest(commands)?;
    Ok(forest.into_iter().map(compile).collect())
}

async fn resolve_file(
    base: &Path,
    path: &Path,
    config: &DiscoverConfig,
    loader: &dyn ModuleLoader,
) -> Result<FileCommand> {
    let mut segments = segment(path, base);
    drop_extension_token(&mut segments);
    let Some(fallback_name) = segments.last().cloned() else {
        return Err(Error::EmptySegments {
            path: path.to_path_buf(),
        });
    };

    let descriptor = resolve(path, &fallback_name, loader).await?;
    if config.validation {
        validate_positionals(&descriptor, path).await?;
    }
    Ok(FileCommand {
        full_path: path.to_path_buf(),
        segments,
        descriptor,
    })
}
