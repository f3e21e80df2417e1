use crate::error::{Error, Result};
use cmdtree_types::{CommandDescriptor, OptionBuilder, OptionSchema, OptionSpec, PositionalSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Matches `<name>` and `[name]` positional tokens in a command name.
static POSITIONAL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[<\[]([^>\]]+)[>\]]").unwrap());

/// Extract the positional names declared in a command-name string, left to
/// right. Variadic markers (`<files..>`) are trimmed to the bare name.
pub fn declared_positionals(name: &str) -> Vec<String> {
    POSITIONAL_TOKEN
        .captures_iter(name)
        .map(|caps| caps[1].trim_end_matches('.').to_string())
        .collect()
}

/// Option-schema stand-in that records positional registrations and
/// otherwise does nothing.
#[derive(Default)]
struct RecordingSchema {
    positionals: Vec<String>,
}

impl OptionSchema for RecordingSchema {
    fn positional(&mut self, name: &str, _spec: PositionalSpec) {
        self.positionals.push(name.to_string());
    }

    fn option(&mut self, _name: &str, _spec: OptionSpec) {}
}

/// Collect the positionals a builder actually registers by trial-executing
/// it against a recording schema. A builder error stops the recording but
/// is not itself a validation failure; the parsing library re-surfaces a
/// real builder error at invocation time. Static mappings cannot register
/// positionals, so they yield the empty list without any execution.
async fn registered_positionals(builder: &OptionBuilder) -> Vec<String> {
    match builder {
        OptionBuilder::Static(_) => Vec::new(),
        OptionBuilder::Func(build) => {
            let mut probe = RecordingSchema::default();
            let _ = build(&mut probe).await;
            probe.positionals
        }
    }
}

/// Cross-check builder-registered positionals against the tokens declared
/// in the command name. Every registered positional must be declared; the
/// reverse is not required (a declared-but-unregistered positional is an
/// unconsumed positional at parse time). Only the primary name form is
/// inspected; aliases are assumed consistent with it.
pub async fn validate_positionals(descriptor: &CommandDescriptor, path: &Path) -> Result<()> {
    let registered = registered_positionals(&descriptor.builder).await;
    if registered.is_empty() {
        return Ok(());
    }

    let command = descriptor.name.primary().to_string();
    let declared = declared_positionals(&command);
    if declared.is_empty() {
        return Err(Error::UndeclaredPositionals {
            path: path.to_path_buf(),
            command,
            positionals: registered,
        });
    }

    let unknown: Vec<String> = registered
        .into_iter()
        .filter(|positional| !declared.contains(positional))
        .collect();
    if !unknown.is_empty() {
        return Err(Error::UnknownPositionals {
            path: path.to_path_buf(),
            command,
            positionals: unknown,
        });
    }
    Ok(())
}
