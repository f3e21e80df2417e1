use crate::descriptor::{CommandSpec, Deprecated, Describe, Handler, OptionBuilder};

/// One named top-level export of a command module.
#[derive(Debug, Clone)]
pub enum Binding {
    /// Bundled style: a full command spec, conventionally exported as `command`.
    Command(CommandSpec),
    Describe(Describe),
    Builder(OptionBuilder),
    Handler(Handler),
    Deprecated(Deprecated),
    Aliases(Vec<String>),
}

/// Exported bindings of one command module, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    bindings: Vec<(String, Binding)>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundled-style module: a single `command` export.
    pub fn bundled(spec: CommandSpec) -> Self {
        Self::new().with("command", Binding::Command(spec))
    }

    pub fn push(&mut self, name: impl Into<String>, binding: Binding) -> &mut Self {
        self.bindings.push((name.into(), binding));
        self
    }

    pub fn with(mut self, name: impl Into<String>, binding: Binding) -> Self {
        self.push(name, binding);
        self
    }

    pub fn bindings(&self) -> &[(String, Binding)] {
        &self.bindings
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|(binding_name, _)| binding_name == name)
            .map(|(_, binding)| binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_keep_declaration_order() {
        let exports = ModuleExports::new()
            .with("describe", Binding::Describe(Describe::Text("x".into())))
            .with("handler", Binding::Handler(Handler::noop()));
        let names: Vec<&str> = exports
            .bindings()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["describe", "handler"]);
    }

    #[test]
    fn test_bundled_exposes_command_binding() {
        let exports = ModuleExports::bundled(CommandSpec::default());
        assert!(matches!(exports.get("command"), Some(Binding::Command(_))));
        assert!(exports.get("describe").is_none());
    }
}
