use crate::tree::SegmentTreeNode;
use cmdtree_types::{
    CommandDescriptor, CommandName, Deprecated, Describe, Handler, OptionBuilder,
};

/// A ready-to-register command: a complete descriptor plus nested
/// subcommands for synthesized groups.
#[derive(Debug, Clone)]
pub struct CommandModule {
    pub descriptor: CommandDescriptor,
    pub subcommands: Vec<CommandModule>,
    /// For groups: selecting a subcommand is mandatory. The message names
    /// the group.
    pub require_subcommand: Option<String>,
}

/// Lower a finished tree into the module shape clap can register.
///
/// Leaves pass their descriptor through unchanged. Internal nodes
/// synthesize a group command whose handler is an intentional no-op:
/// unreachable in practice because a subcommand must be selected, but the
/// module shape still requires one. Purely structural; no failure modes.
pub fn compile(node: SegmentTreeNode) -> CommandModule {
    match node {
        SegmentTreeNode::Leaf { command, .. } => CommandModule {
            descriptor: command.descriptor,
            subcommands: Vec::new(),
            require_subcommand: None,
        },
        SegmentTreeNode::Internal { name, children, .. } => CommandModule {
            descriptor: CommandDescriptor {
                name: CommandName::Single(name.clone()),
                aliases: Vec::new(),
                describe: Describe::Text(format!("{name} commands")),
                deprecated: Deprecated::No,
                builder: OptionBuilder::empty(),
                handler: Handler::noop(),
            },
            subcommands: children.into_iter().map(compile).collect(),
            require_subcommand: Some(format!("select one of the {name} subcommands")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{FileCommand, build_forest};
    use std::path::PathBuf;

    fn file_command(path: &str, segments: &[&str], describe: &str) -> FileCommand {
        FileCommand {
            full_path: PathBuf::from(path),
            segments: segments.iter().map(|s| s.to_string()).collect(),
            descriptor: CommandDescriptor {
                name: CommandName::Single(segments.last().unwrap().to_string()),
                aliases: Vec::new(),
                describe: Describe::Text(describe.to_string()),
                deprecated: Deprecated::No,
                builder: OptionBuilder::empty(),
                handler: Handler::noop(),
            },
        }
    }

    #[test]
    fn test_leaf_descriptor_passes_through_unchanged() {
        let forest = build_forest(vec![file_command("/c/deploy.ts", &["deploy"], "Deploy it")])
            .unwrap();
        let module = compile(forest.into_iter().next().unwrap());

        assert_eq!(module.descriptor.name.primary(), "deploy");
        assert_eq!(
            module.descriptor.describe,
            Describe::Text("Deploy it".to_string())
        );
        assert!(module.subcommands.is_empty());
        assert!(module.require_subcommand.is_none());
    }

    #[test]
    fn test_internal_node_synthesizes_group_module() {
        let forest = build_forest(vec![
            file_command("/c/db/migration.ts", &["db", "migration"], "Migrate"),
            file_command("/c/db/health.ts", &["db", "health"], "Health"),
        ])
        .unwrap();
        let module = compile(forest.into_iter().next().unwrap());

        assert_eq!(module.descriptor.name.primary(), "db");
        assert_eq!(
            module.descriptor.describe,
            Describe::Text("db commands".to_string())
        );
        let message = module.require_subcommand.expect("groups require a subcommand");
        assert!(message.contains("db"));

        let sub_names: Vec<&str> = module
            .subcommands
            .iter()
            .map(|sub| sub.descriptor.name.primary())
            .collect();
        assert_eq!(sub_names, ["migration", "health"]);
    }
}
