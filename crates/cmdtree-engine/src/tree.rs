use crate::error::{Error, Result};
use cmdtree_types::CommandDescriptor;
use std::path::PathBuf;

/// One discovered command file: where it lives, the command-name tokens
/// derived from its path, and its resolved contract. Created once per
/// scan, consumed by the tree builder, never mutated.
#[derive(Debug, Clone)]
pub struct FileCommand {
    pub full_path: PathBuf,
    pub segments: Vec<String>,
    pub descriptor: CommandDescriptor,
}

/// Node of the command hierarchy. Internal nodes are directory-level
/// groupings with no contract of their own; leaves are invokable commands.
/// Within one sibling list, names are unique and a name is never both.
#[derive(Debug)]
pub enum SegmentTreeNode {
    Internal {
        name: String,
        /// First file that forced this directory level, kept for conflict
        /// diagnostics.
        origin: PathBuf,
        children: Vec<SegmentTreeNode>,
    },
    Leaf {
        name: String,
        command: FileCommand,
    },
}

impl SegmentTreeNode {
    pub fn name(&self) -> &str {
        match self {
            SegmentTreeNode::Internal { name, .. } => name,
            SegmentTreeNode::Leaf { name, .. } => name,
        }
    }

    fn defining_path(&self) -> &PathBuf {
        match self {
            SegmentTreeNode::Internal { origin, .. } => origin,
            SegmentTreeNode::Leaf { command, .. } => &command.full_path,
        }
    }
}

/// Insert every command into a shared forest. Sibling order is first-seen
/// insertion order, never sorted: it governs help-text ordering downstream
/// and is an observable property.
pub fn build_forest(commands: Vec<FileCommand>) -> Result<Vec<SegmentTreeNode>> {
    let mut forest = Vec::new();
    for command in commands {
        insert(&mut forest, command)?;
    }
    Ok(forest)
}

fn insert(forest: &mut Vec<SegmentTreeNode>, command: FileCommand) -> Result<()> {
    let segments = command.segments.clone();
    let Some((last, dirs)) = segments.split_last() else {
        return Err(Error::EmptySegments {
            path: command.full_path,
        });
    };

    let mut siblings: &mut Vec<SegmentTreeNode> = forest;
    for seg in dirs {
        siblings = descend(siblings, seg, &command)?;
    }

    if let Some(existing) = siblings.iter().find(|node| node.name() == last.as_str()) {
        return Err(Error::SegmentConflict {
            segment: last.clone(),
            first: existing.defining_path().clone(),
            second: command.full_path,
        });
    }
    siblings.push(SegmentTreeNode::Leaf {
        name: last.clone(),
        command,
    });
    Ok(())
}

/// Walk into (or create) the internal node for one directory-level
/// segment. Hitting a leaf here means a command already claims the name
/// this command needs as a directory level.
fn descend<'a>(
    siblings: &'a mut Vec<SegmentTreeNode>,
    seg: &str,
    command: &FileCommand,
) -> Result<&'a mut Vec<SegmentTreeNode>> {
    let idx = match siblings.iter().position(|node| node.name() == seg) {
        Some(idx) => idx,
        None => {
            siblings.push(SegmentTreeNode::Internal {
                name: seg.to_string(),
                origin: command.full_path.clone(),
                children: Vec::new(),
            });
            siblings.len() - 1
        }
    };
    match &mut siblings[idx] {
        SegmentTreeNode::Internal { children, .. } => Ok(children),
        SegmentTreeNode::Leaf { command: existing, .. } => Err(Error::SegmentConflict {
            segment: seg.to_string(),
            first: existing.full_path.clone(),
            second: command.full_path.clone(),
        }),
    }
}
