use crate::error::{Error, Result};
use cmdtree_types::ModuleExports;
use std::path::{Path, PathBuf};

/// Supplies the exported bindings of one command module.
///
/// Foreign code cannot be loaded at runtime here, so modules are
/// registered ahead of time; the file tree still decides which modules
/// exist and how they nest.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<ModuleExports>;
}

/// Registration table keyed by registry-relative path.
///
/// A discovered absolute path is served by the first entry it ends with,
/// so `db/migration.ts` matches `/app/commands/db/migration.ts` no matter
/// where the command directory lives.
#[derive(Default)]
pub struct RegistryLoader {
    entries: Vec<(PathBuf, ModuleExports)>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, relative: impl Into<PathBuf>, exports: ModuleExports) -> &mut Self {
        self.entries.push((relative.into(), exports));
        self
    }

    pub fn with(mut self, relative: impl Into<PathBuf>, exports: ModuleExports) -> Self {
        self.register(relative, exports);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ModuleLoader for RegistryLoader {
    fn load(&self, path: &Path) -> Result<ModuleExports> {
        self.entries
            .iter()
            .find(|(relative, _)| path.ends_with(relative))
            .map(|(_, exports)| exports.clone())
            .ok_or_else(|| Error::Load {
                path: path.to_path_buf(),
                reason: "no module registered for this path".to_string(),
            })
    }
}
