use crate::compile::CommandModule;
use crate::error::{Error, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use cmdtree_types::{
    Deprecated, Describe, OptionBuilder, OptionSchema, OptionSpec, PositionalSpec, ROOT_MARKER,
};
use futures::future::BoxFuture;

/// clap-backed option schema: builder registrations become real `Arg`s.
///
/// Positionals declared through name tokens are seeded first; a builder
/// registration for the same name refines that argument (help text,
/// default, requiredness) instead of adding a duplicate.
struct ClapSchema {
    args: Vec<Arg>,
}

impl ClapSchema {
    fn new() -> Self {
        Self { args: Vec::new() }
    }

    fn seeded(args: Vec<Arg>) -> Self {
        Self { args }
    }
}

impl OptionSchema for ClapSchema {
    fn positional(&mut self, name: &str, spec: PositionalSpec) {
        if let Some(idx) = self.args.iter().position(|arg| arg.get_id().as_str() == name) {
            let mut arg = self.args.remove(idx);
            if let Some(describe) = spec.describe {
                arg = arg.help(describe);
            }
            if let Some(default) = spec.default_value {
                arg = arg.default_value(default).required(false);
            } else if spec.required {
                arg = arg.required(true);
            }
            self.args.insert(idx, arg);
        } else {
            let mut arg = Arg::new(name.to_string()).required(spec.required);
            if let Some(describe) = spec.describe {
                arg = arg.help(describe);
            }
            if let Some(default) = spec.default_value {
                arg = arg.default_value(default).required(false);
            }
            self.args.push(arg);
        }
    }

    fn option(&mut self, name: &str, spec: OptionSpec) {
        let mut arg = Arg::new(name.to_string()).long(name.to_string());
        if spec.takes_value || spec.default_value.is_some() {
            arg = arg.action(ArgAction::Set);
        } else {
            arg = arg.action(ArgAction::SetTrue);
        }
        if let Some(short) = spec.short {
            arg = arg.short(short);
        }
        if let Some(describe) = spec.describe {
            arg = arg.help(describe);
        }
        if let Some(default) = spec.default_value {
            arg = arg.default_value(default);
        }
        if spec.required {
            arg = arg.required(true);
        }
        self.args.push(arg);
    }
}

fn first_word(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Split a declared command name into the literal command word and the
/// positional `Arg`s its `<required>` / `[optional]` tokens declare.
fn parse_name(name: &str) -> (String, Vec<Arg>) {
    let mut words = name.split_whitespace();
    let word = words.next().unwrap_or_default().to_string();

    let mut args = Vec::new();
    for token in words {
        let (inner, required) = if let Some(inner) = token
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        {
            (inner, true)
        } else if let Some(inner) = token
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            (inner, false)
        } else {
            continue;
        };

        let variadic = inner.ends_with("..");
        let mut arg = Arg::new(inner.trim_end_matches('.').to_string()).required(required);
        if variadic {
            arg = arg.num_args(if required { 1.. } else { 0.. });
        }
        args.push(arg);
    }
    (word, args)
}

fn about_text(describe: &Describe, deprecated: &Deprecated) -> Option<String> {
    let text = match describe {
        Describe::Text(text) => text.as_str(),
        Describe::Hidden => return None,
    };
    Some(match deprecated {
        Deprecated::No => text.to_string(),
        Deprecated::Yes => format!("{text} [deprecated]"),
        Deprecated::Replaced(message) => format!("{text} [deprecated: {message}]"),
    })
}

async fn apply_builder(
    builder: &OptionBuilder,
    schema: &mut ClapSchema,
    command: &str,
) -> Result<()> {
    match builder {
        OptionBuilder::Func(build) => {
            build(schema)
                .await
                .map_err(|source| Error::Builder {
                    command: command.to_string(),
                    source,
                })
        }
        OptionBuilder::Static(options) => {
            for (name, spec) in options {
                schema.option(name, spec.clone());
            }
            Ok(())
        }
    }
}

/// Recursive by module nesting, so the future is boxed.
fn build_command(module: &CommandModule) -> BoxFuture<'_, Result<Command>> {
    Box::pin(async move {
        let descriptor = &module.descriptor;
        let (word, name_args) = parse_name(descriptor.name.primary());
        let mut cmd = Command::new(word.clone());

        match about_text(&descriptor.describe, &descriptor.deprecated) {
            Some(about) => cmd = cmd.about(about),
            None => cmd = cmd.hide(true),
        }

        let mut aliases: Vec<String> = descriptor
            .name
            .alias_tail()
            .iter()
            .map(|alias| first_word(alias))
            .collect();
        aliases.extend(descriptor.aliases.iter().cloned());
        if !aliases.is_empty() {
            cmd = cmd.visible_aliases(aliases);
        }

        let mut schema = ClapSchema::seeded(name_args);
        apply_builder(&descriptor.builder, &mut schema, &word).await?;
        cmd = cmd.args(schema.args);

        let mut require = module.require_subcommand.clone();
        for sub in &module.subcommands {
            if sub.descriptor.name.primary() == ROOT_MARKER {
                // Default command: its options belong to this command
                // itself, and a subcommand is no longer mandatory.
                let mut default_schema = ClapSchema::new();
                apply_builder(&sub.descriptor.builder, &mut default_schema, &word).await?;
                cmd = cmd.args(default_schema.args);
                require = None;
                continue;
            }
            cmd = cmd.subcommand(build_command(sub).await?);
        }
        if let Some(message) = require {
            cmd = cmd
                .subcommand_required(true)
                .arg_required_else_help(true)
                .after_help(message);
        }
        Ok(cmd)
    })
}

fn default_module(modules: &[CommandModule]) -> Option<&CommandModule> {
    modules
        .iter()
        .find(|module| module.descriptor.name.primary() == ROOT_MARKER)
}

fn dispatch_level<'a>(
    modules: &'a [CommandModule],
    matches: &'a ArgMatches,
) -> BoxFuture<'a, anyhow::Result<()>> {
    Box::pin(async move {
        if let Some((name, sub_matches)) = matches.subcommand() {
            let selected = modules
                .iter()
                .find(|module| first_word(module.descriptor.name.primary()) == name);
            let Some(module) = selected else {
                anyhow::bail!("no handler registered for command '{name}'");
            };
            if sub_matches.subcommand().is_some() && !module.subcommands.is_empty() {
                dispatch_level(&module.subcommands, sub_matches).await
            } else if let Some(default) = default_module(&module.subcommands) {
                default.descriptor.handler.invoke(sub_matches.clone()).await
            } else {
                module.descriptor.handler.invoke(sub_matches.clone()).await
            }
        } else if let Some(default) = default_module(modules) {
            default.descriptor.handler.invoke(matches.clone()).await
        } else {
            Ok(())
        }
    })
}

/// The discovered command surface, ready to hand to clap.
pub struct CommandSet {
    modules: Vec<CommandModule>,
}

impl CommandSet {
    pub fn new(modules: Vec<CommandModule>) -> Self {
        Self { modules }
    }

    pub fn modules(&self) -> &[CommandModule] {
        &self.modules
    }

    /// Assemble the root clap command with every discovered module
    /// registered. Builders run for real here, so a failing user builder
    /// surfaces as `Error::Builder`.
    pub async fn build_cli(&self, bin_name: &str) -> Result<Command> {
        let mut root = Command::new(bin_name.to_string());
        let mut require_subcommand = true;
        for module in &self.modules {
            if module.descriptor.name.primary() == ROOT_MARKER {
                let mut schema = ClapSchema::new();
                apply_builder(&module.descriptor.builder, &mut schema, bin_name).await?;
                root = root.args(schema.args);
                require_subcommand = false;
                continue;
            }
            root = root.subcommand(build_command(module).await?);
        }
        if require_subcommand {
            root = root.subcommand_required(true).arg_required_else_help(true);
        }
        Ok(root)
    }

    /// Walk the selected subcommand path and invoke the matching handler.
    /// A group with a default command falls back to it when the selection
    /// stops at the group.
    pub async fn dispatch(&self, matches: &ArgMatches) -> anyhow::Result<()> {
        dispatch_level(&self.modules, matches).await
    }
}
