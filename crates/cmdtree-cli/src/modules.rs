//! Built-in command modules for the demo registry.
//!
//! Discovery is driven by the files on disk; this registry supplies the
//! command contracts those files stand for. A file with no matching
//! registry entry is a load error.

use anyhow::Result;
use clap::ArgMatches;
use cmdtree_engine::RegistryLoader;
use cmdtree_types::{
    Binding, CommandName, CommandSpec, Deprecated, Describe, Handler, ModuleExports, OptionBuilder,
    OptionSchema, OptionSpec, PositionalSpec,
};
use futures::future::BoxFuture;

/// The commands shipped with the demo binary, keyed by registry-relative
/// path. Drop matching (possibly empty) files into a commands directory
/// to place them in the tree.
pub fn demo_registry() -> RegistryLoader {
    RegistryLoader::new()
        .with("db/migration.ts", migration_module())
        .with("db/health.ts", health_module())
        .with("create.ts", create_module())
        .with("studio.start.ts", studio_start_module())
        .with("deploy.ts", deploy_module())
        .with("$default.ts", default_module())
}

/// Flat style: separate `describe` / `builder` / `handler` exports.
fn migration_module() -> ModuleExports {
    ModuleExports::new()
        .with(
            "describe",
            Binding::Describe(Describe::Text("Run pending database migrations".to_string())),
        )
        .with(
            "builder",
            Binding::Builder(OptionBuilder::func_sync(|schema| {
                schema.option(
                    "target",
                    OptionSpec {
                        describe: Some("Migrate up to this version".to_string()),
                        takes_value: true,
                        ..Default::default()
                    },
                );
                schema.option(
                    "dry-run",
                    OptionSpec {
                        describe: Some("Print the plan without applying it".to_string()),
                        ..Default::default()
                    },
                );
                Ok(())
            })),
        )
        .with(
            "handler",
            Binding::Handler(Handler::new(|matches: ArgMatches| async move {
                let target = matches
                    .get_one::<String>("target")
                    .cloned()
                    .unwrap_or_else(|| "latest".to_string());
                if matches.get_flag("dry-run") {
                    println!("would migrate to {target}");
                } else {
                    println!("migrating to {target}");
                }
                Ok(())
            })),
        )
}

fn health_module() -> ModuleExports {
    ModuleExports::bundled(CommandSpec {
        describe: Some(Describe::Text("Check database connectivity".to_string())),
        handler: Some(Handler::new(|_matches| async {
            println!("database: ok");
            Ok(())
        })),
        ..Default::default()
    })
}

fn create_builder(schema: &mut dyn OptionSchema) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        schema.positional(
            "name",
            PositionalSpec {
                describe: Some("Name of the project to create".to_string()),
                required: true,
                ..Default::default()
            },
        );
        schema.positional(
            "template",
            PositionalSpec {
                describe: Some("Project template".to_string()),
                default_value: Some("default".to_string()),
                ..Default::default()
            },
        );
        Ok(())
    })
}

/// Positional demo: the name declares the tokens, the builder refines them.
fn create_module() -> ModuleExports {
    ModuleExports::bundled(CommandSpec {
        name: Some(CommandName::Single("create <name> [template]".to_string())),
        describe: Some(Describe::Text("Create a new project".to_string())),
        builder: Some(OptionBuilder::func(create_builder)),
        handler: Some(Handler::new(|matches: ArgMatches| async move {
            let name = matches
                .get_one::<String>("name")
                .cloned()
                .unwrap_or_default();
            let template = matches
                .get_one::<String>("template")
                .cloned()
                .unwrap_or_default();
            println!("creating {name} from template {template}");
            Ok(())
        })),
        ..Default::default()
    })
}

fn studio_start_module() -> ModuleExports {
    ModuleExports::new()
        .with(
            "describe",
            Binding::Describe(Describe::Text("Start the studio server".to_string())),
        )
        .with(
            "handler",
            Binding::Handler(Handler::new(|_matches| async {
                println!("studio listening on :4000");
                Ok(())
            })),
        )
}

fn deploy_module() -> ModuleExports {
    ModuleExports::bundled(CommandSpec {
        describe: Some(Describe::Text("Deploy the current project".to_string())),
        aliases: vec!["ship".to_string()],
        deprecated: Some(Deprecated::Replaced("use 'release' instead".to_string())),
        handler: Some(Handler::new(|_matches| async {
            println!("deploying");
            Ok(())
        })),
        ..Default::default()
    })
}

/// Root default: runs when no subcommand is selected.
fn default_module() -> ModuleExports {
    ModuleExports::bundled(CommandSpec {
        describe: Some(Describe::Text("Show an overview".to_string())),
        handler: Some(Handler::new(|_matches| async {
            println!("cmdtree demo: drop command files into a directory and run them");
            Ok(())
        })),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use cmdtree_engine::ModuleLoader;

    #[test]
    fn test_registry_covers_demo_paths() {
        let loader = demo_registry();
        for rel in [
            "db/migration.ts",
            "db/health.ts",
            "create.ts",
            "studio.start.ts",
            "deploy.ts",
            "$default.ts",
        ] {
            let path = Path::new("/app/commands").join(rel);
            assert!(loader.load(&path).is_ok(), "no module for {rel}");
        }
    }

    #[test]
    fn test_unregistered_path_is_a_load_error() {
        let loader = demo_registry();
        assert!(loader.load(Path::new("/app/commands/unknown.ts")).is_err());
    }
}
