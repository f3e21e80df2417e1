// Error types
pub mod error;

// Discovery configuration
pub mod config;

// Path segmentation
pub mod segment;

// Filesystem scanning
pub mod scan;

// Module loading
pub mod loader;

// Command resolution
pub mod resolve;

// Positional validation
pub mod validate;

// Segment tree construction
pub mod tree;

// Tree-to-module compilation
pub mod compile;

// clap registration bridge
pub mod register;

// Discovery pipeline
pub mod discover;

pub use compile::{CommandModule, compile};
pub use config::{DEFAULT_EXTENSIONS, DEFAULT_IGNORE_PATTERNS, DiscoverConfig, LogLevel};
pub use discover::discover_commands;
pub use error::{Error, Result};
pub use loader::{ModuleLoader, RegistryLoader};
pub use register::CommandSet;
pub use resolve::resolve;
pub use scan::{ScanFilter, scan_dir};
pub use segment::{drop_extension_token, segment};
pub use tree::{FileCommand, SegmentTreeNode, build_forest};
pub use validate::{declared_positionals, validate_positionals};
