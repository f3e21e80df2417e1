/// Specification of one named (flag-style) option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpec {
    pub describe: Option<String>,
    pub required: bool,
    /// When false (and no default is set) the option is a boolean flag.
    pub takes_value: bool,
    pub default_value: Option<String>,
    pub short: Option<char>,
}

/// Specification of one positional argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionalSpec {
    pub describe: Option<String>,
    pub required: bool,
    pub default_value: Option<String>,
}

/// Mutable option-schema context handed to `OptionBuilder::Func` builders.
///
/// The engine supplies two implementations: a recording probe used by the
/// positional validator, and a clap-backed schema used when the command
/// tree is registered for real.
pub trait OptionSchema: Send {
    /// Register a positional argument.
    fn positional(&mut self, name: &str, spec: PositionalSpec);

    /// Register a named option.
    fn option(&mut self, name: &str, spec: OptionSpec);
}
