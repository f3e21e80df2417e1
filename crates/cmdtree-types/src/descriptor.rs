use crate::schema::{OptionSchema, OptionSpec};
use clap::ArgMatches;
use futures::future::{self, BoxFuture};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Reserved final segment naming a group's (or the root's) default
/// invocation, the one that runs when no subcommand is given.
pub const DEFAULT_SENTINEL: &str = "$default";

/// Name a default command resolves to. The clap bridge understands it as
/// "attach to the parent command instead of becoming a subcommand".
pub const ROOT_MARKER: &str = "$0";

/// Filler filename token dropped during segmentation, so that
/// `<group>/command.<ext>` does not introduce a redundant path segment.
pub const COMMAND_FILLER: &str = "command";

pub type HandlerFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Async action invoked when its command is the final selected command.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(ArgMatches) -> HandlerFuture + Send + Sync>);

impl Handler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ArgMatches) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self(Arc::new(move |matches| Box::pin(f(matches))))
    }

    /// Synthesized for command files that declare no handler of their own,
    /// so directory-grouping-only files need no boilerplate.
    pub fn noop() -> Self {
        Self::new(|_| future::ready(Ok(())))
    }

    pub fn invoke(&self, matches: ArgMatches) -> HandlerFuture {
        (self.0)(matches)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

pub type BuilderFn =
    Arc<dyn for<'a> Fn(&'a mut dyn OptionSchema) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync>;

/// How a command declares its option schema: a callable that augments a
/// schema context (possibly asynchronously), or a static option-name to
/// specification mapping. Exactly one representation is active.
///
/// Static mappings cannot register positionals; only `Func` builders are
/// trial-executed by the positional validator.
#[derive(Clone)]
pub enum OptionBuilder {
    Func(BuilderFn),
    Static(BTreeMap<String, OptionSpec>),
}

impl OptionBuilder {
    pub fn func<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut dyn OptionSchema) -> BoxFuture<'a, anyhow::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Builder from a synchronous closure.
    pub fn func_sync<F>(f: F) -> Self
    where
        F: Fn(&mut dyn OptionSchema) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Func(Arc::new(
            move |schema: &mut dyn OptionSchema| -> BoxFuture<'_, anyhow::Result<()>> {
                Box::pin(future::ready(f(schema)))
            },
        ))
    }

    pub fn empty() -> Self {
        Self::Static(BTreeMap::new())
    }
}

impl Default for OptionBuilder {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for OptionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionBuilder::Func(_) => f.write_str("OptionBuilder::Func(..)"),
            OptionBuilder::Static(options) => f
                .debug_tuple("OptionBuilder::Static")
                .field(&options.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Command name as declared by its module. May embed `<required>` and
/// `[optional]` positional tokens after the command word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandName {
    Single(String),
    /// First element is the primary form; the rest are aliases.
    Aliased(Vec<String>),
}

impl CommandName {
    pub fn primary(&self) -> &str {
        match self {
            CommandName::Single(name) => name,
            CommandName::Aliased(names) => names.first().map(String::as_str).unwrap_or_default(),
        }
    }

    pub fn alias_tail(&self) -> &[String] {
        match self {
            CommandName::Single(_) => &[],
            CommandName::Aliased(names) => names.get(1..).unwrap_or(&[]),
        }
    }
}

/// Help text, or an explicit marker that the command is omitted from help.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Describe {
    Text(String),
    #[default]
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Deprecated {
    #[default]
    No,
    Yes,
    /// Deprecated with a replacement message.
    Replaced(String),
}

/// Normalized command contract, independent of the declaration style the
/// source module used.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub name: CommandName,
    pub aliases: Vec<String>,
    pub describe: Describe,
    pub deprecated: Deprecated,
    pub builder: OptionBuilder,
    pub handler: Handler,
}

/// The bundled declaration style: one structured export carrying the whole
/// command contract. Fields left unset fall back to resolver defaults.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub name: Option<CommandName>,
    pub aliases: Vec<String>,
    pub describe: Option<Describe>,
    pub deprecated: Option<Deprecated>,
    pub builder: Option<OptionBuilder>,
    pub handler: Option<Handler>,
}
