use std::fmt;
use std::path::PathBuf;

/// Result type for cmdtree-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort the discovery pipeline. Nothing is recovered
/// locally: the first error surfaces to the caller and no partial command
/// tree is ever produced.
#[derive(Debug)]
pub enum Error {
    /// Bad discovery configuration, rejected before any I/O
    Config(String),

    /// Scan root missing or unreadable
    Scan { dir: PathBuf, source: std::io::Error },

    /// Directory traversal failed below the scan root
    Walk {
        dir: PathBuf,
        source: walkdir::Error,
    },

    /// An ignore pattern failed to compile
    Pattern {
        pattern: String,
        source: globset::Error,
    },

    /// Command file disappeared between scan and resolve
    MissingFile { path: PathBuf },

    /// Module loading failed
    Load { path: PathBuf, reason: String },

    /// Flat-style module exported names outside the recognized set
    UnsupportedExports { path: PathBuf, names: Vec<String> },

    /// Segmentation produced no command-name tokens
    EmptySegments { path: PathBuf },

    /// Builder registered positionals but the command name declares none
    UndeclaredPositionals {
        path: PathBuf,
        command: String,
        positionals: Vec<String>,
    },

    /// Builder registered positionals missing from the declared name
    UnknownPositionals {
        path: PathBuf,
        command: String,
        positionals: Vec<String>,
    },

    /// A segment name is claimed by two definitions (command vs. command,
    /// or command vs. directory level)
    SegmentConflict {
        segment: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A builder failed while the command tree was being registered
    Builder {
        command: String,
        source: anyhow::Error,
    },

    /// No command files found across all configured directories
    NoCommands { dirs: Vec<PathBuf> },
}

fn join_paths(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(message) => write!(f, "invalid discovery configuration: {}", message),
            Error::Scan { dir, source } => {
                write!(f, "cannot scan command directory {}: {}", dir.display(), source)
            }
            Error::Walk { dir, source } => {
                write!(f, "error walking command directory {}: {}", dir.display(), source)
            }
            Error::Pattern { pattern, source } => {
                write!(f, "invalid ignore pattern {:?}: {}", pattern, source)
            }
            Error::MissingFile { path } => {
                write!(f, "command file does not exist: {}", path.display())
            }
            Error::Load { path, reason } => {
                write!(f, "failed to load command module {}: {}", path.display(), reason)
            }
            Error::UnsupportedExports { path, names } => write!(
                f,
                "unsupported exports [{}] in command module {}",
                names.join(", "),
                path.display()
            ),
            Error::EmptySegments { path } => write!(
                f,
                "command file {} yields no command name segments",
                path.display()
            ),
            Error::UndeclaredPositionals {
                path,
                command,
                positionals,
            } => write!(
                f,
                "command '{}' ({}) registers positional arguments [{}] but its name declares no \
                 positional tokens; add <{}> style tokens to the command name",
                command,
                path.display(),
                positionals.join(", "),
                positionals.first().map(String::as_str).unwrap_or("name"),
            ),
            Error::UnknownPositionals {
                path,
                command,
                positionals,
            } => write!(
                f,
                "command '{}' ({}) registers positional arguments [{}] that are not declared in \
                 its name",
                command,
                path.display(),
                positionals.join(", "),
            ),
            Error::SegmentConflict {
                segment,
                first,
                second,
            } => write!(
                f,
                "command name conflict on segment '{}': {} and {} both claim it",
                segment,
                first.display(),
                second.display(),
            ),
            Error::Builder { command, source } => {
                write!(f, "builder for command '{}' failed: {}", command, source)
            }
            Error::NoCommands { dirs } => {
                write!(f, "no command files found in: {}", join_paths(dirs))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Scan { source, .. } => Some(source),
            Error::Walk { source, .. } => Some(source),
            Error::Pattern { source, .. } => Some(source),
            Error::Builder { source, .. } => {
                let source: &(dyn std::error::Error + 'static) = source.as_ref();
                Some(source)
            }
            _ => None,
        }
    }
}
