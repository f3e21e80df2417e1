use crate::error::{Error, Result};
use crate::loader::ModuleLoader;
use cmdtree_types::{
    Binding, CommandDescriptor, CommandName, CommandSpec, DEFAULT_SENTINEL, Deprecated, Describe,
    Handler, ModuleExports, OptionBuilder, ROOT_MARKER,
};
use std::path::Path;
use tracing::debug;

/// Flat-style export names the resolver understands. Anything else in a
/// flat module is a hard error, so typos like `describtion` surface at
/// discovery time instead of silently producing a broken command.
const RECOGNIZED_EXPORTS: &[&str] = &["describe", "builder", "handler", "deprecated", "aliases"];

/// Load one command file's module and normalize it into a descriptor.
///
/// Two declaration styles are tried in order: bundled (a single `command`
/// export carrying the whole contract) and flat (individual top-level
/// exports). A missing handler is replaced with a no-op so
/// directory-grouping-only command files need no boilerplate.
pub async fn resolve(
    path: &Path,
    fallback_name: &str,
    loader: &dyn ModuleLoader,
) -> Result<CommandDescriptor> {
    // Explicit existence check so a vanished file yields an unambiguous
    // error instead of a generic load failure.
    if tokio::fs::metadata(path).await.is_err() {
        return Err(Error::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let exports = loader.load(path)?;
    let descriptor = match bundled_spec(&exports) {
        Some(spec) => from_bundled(spec, fallback_name),
        None => from_flat(&exports, fallback_name, path)?,
    };

    debug!(
        path = %path.display(),
        name = descriptor.name.primary(),
        "resolved command module"
    );
    Ok(descriptor)
}

fn bundled_spec(exports: &ModuleExports) -> Option<CommandSpec> {
    match exports.get("command") {
        Some(Binding::Command(spec)) => Some(spec.clone()),
        _ => None,
    }
}

/// The `$default` sentinel never becomes a literal command name; it binds
/// to the parsing library's root-invocation marker instead.
fn fallback_command_name(fallback_name: &str) -> CommandName {
    if fallback_name == DEFAULT_SENTINEL {
        CommandName::Single(ROOT_MARKER.to_string())
    } else {
        CommandName::Single(fallback_name.to_string())
    }
}

fn from_bundled(spec: CommandSpec, fallback_name: &str) -> CommandDescriptor {
    CommandDescriptor {
        name: spec
            .name
            .unwrap_or_else(|| fallback_command_name(fallback_name)),
        aliases: spec.aliases,
        describe: spec.describe.unwrap_or_default(),
        deprecated: spec.deprecated.unwrap_or_default(),
        builder: spec.builder.unwrap_or_default(),
        handler: spec.handler.unwrap_or_else(Handler::noop),
    }
}

fn from_flat(
    exports: &ModuleExports,
    fallback_name: &str,
    path: &Path,
) -> Result<CommandDescriptor> {
    // Checked against *all* top-level exports, not just the ones read below.
    let rejected: Vec<String> = exports
        .bindings()
        .iter()
        .filter(|(name, _)| !RECOGNIZED_EXPORTS.contains(&name.as_str()))
        .map(|(name, _)| name.clone())
        .collect();
    if !rejected.is_empty() {
        return Err(Error::UnsupportedExports {
            path: path.to_path_buf(),
            names: rejected,
        });
    }

    let mut descriptor = CommandDescriptor {
        name: fallback_command_name(fallback_name),
        aliases: Vec::new(),
        describe: Describe::default(),
        deprecated: Deprecated::default(),
        builder: OptionBuilder::default(),
        handler: Handler::noop(),
    };
    let mut mistyped = Vec::new();
    for (name, binding) in exports.bindings() {
        match (name.as_str(), binding) {
            ("describe", Binding::Describe(describe)) => descriptor.describe = describe.clone(),
            ("builder", Binding::Builder(builder)) => descriptor.builder = builder.clone(),
            ("handler", Binding::Handler(handler)) => descriptor.handler = handler.clone(),
            ("deprecated", Binding::Deprecated(deprecated)) => {
                descriptor.deprecated = deprecated.clone()
            }
            ("aliases", Binding::Aliases(aliases)) => descriptor.aliases = aliases.clone(),
            _ => mistyped.push(name.clone()),
        }
    }
    if !mistyped.is_empty() {
        return Err(Error::UnsupportedExports {
            path: path.to_path_buf(),
            names: mistyped,
        });
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RegistryLoader;
    use std::fs;
    use tempfile::TempDir;

    fn command_file(dir: &TempDir, rel: &str) -> std::path::PathBuf {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_file_error_names_the_path() {
        let loader = RegistryLoader::new();
        let err = resolve(Path::new("/gone/health.ts"), "health", &loader)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingFile { .. }));
        assert!(err.to_string().contains("/gone/health.ts"));
    }

    #[tokio::test]
    async fn test_bundled_name_defaults_to_fallback() {
        let dir = TempDir::new().unwrap();
        let path = command_file(&dir, "health.ts");
        let loader =
            RegistryLoader::new().with("health.ts", ModuleExports::bundled(CommandSpec::default()));

        let descriptor = resolve(&path, "health", &loader).await.unwrap();
        assert_eq!(descriptor.name, CommandName::Single("health".to_string()));
        assert_eq!(descriptor.describe, Describe::Hidden);
    }

    #[tokio::test]
    async fn test_default_sentinel_binds_to_root_marker() {
        let dir = TempDir::new().unwrap();
        let path = command_file(&dir, "$default.ts");
        let loader = RegistryLoader::new()
            .with("$default.ts", ModuleExports::bundled(CommandSpec::default()));

        let descriptor = resolve(&path, DEFAULT_SENTINEL, &loader).await.unwrap();
        assert_eq!(descriptor.name, CommandName::Single(ROOT_MARKER.to_string()));
    }

    #[tokio::test]
    async fn test_flat_exports_are_copied_through() {
        let dir = TempDir::new().unwrap();
        let path = command_file(&dir, "deploy.ts");
        let exports = ModuleExports::new()
            .with("describe", Binding::Describe(Describe::Text("Deploy".into())))
            .with("aliases", Binding::Aliases(vec!["ship".to_string()]))
            .with("deprecated", Binding::Deprecated(Deprecated::Yes));
        let loader = RegistryLoader::new().with("deploy.ts", exports);

        let descriptor = resolve(&path, "deploy", &loader).await.unwrap();
        assert_eq!(descriptor.name, CommandName::Single("deploy".to_string()));
        assert_eq!(descriptor.describe, Describe::Text("Deploy".to_string()));
        assert_eq!(descriptor.aliases, ["ship"]);
        assert_eq!(descriptor.deprecated, Deprecated::Yes);
    }

    #[tokio::test]
    async fn test_unsupported_export_names_are_listed() {
        let dir = TempDir::new().unwrap();
        let path = command_file(&dir, "deploy.ts");
        let exports = ModuleExports::new()
            .with("describtion", Binding::Describe(Describe::Text("typo".into())))
            .with("handler", Binding::Handler(Handler::noop()))
            .with("alias", Binding::Aliases(vec!["d".to_string()]));
        let loader = RegistryLoader::new().with("deploy.ts", exports);

        let err = resolve(&path, "deploy", &loader).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("describtion"));
        assert!(message.contains("alias"));
        assert!(!message.contains("handler,"));
        assert!(message.contains("deploy.ts"));
    }

    #[tokio::test]
    async fn test_bundled_style_ignores_sibling_exports() {
        let dir = TempDir::new().unwrap();
        let path = command_file(&dir, "health.ts");
        let exports = ModuleExports::bundled(CommandSpec {
            describe: Some(Describe::Text("Check health".into())),
            ..Default::default()
        })
        .with("internal_helper", Binding::Aliases(vec![]));
        let loader = RegistryLoader::new().with("health.ts", exports);

        let descriptor = resolve(&path, "health", &loader).await.unwrap();
        assert_eq!(descriptor.describe, Describe::Text("Check health".to_string()));
    }
}
