// CLI argument definitions
pub mod args;

// Run pipeline
pub mod commands;

// Config file loading
pub mod config;

// Built-in demo command registry
pub mod modules;

pub use args::{Cli, LogLevelArg};
pub use commands::run;
