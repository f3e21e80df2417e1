// Command descriptor model
pub mod descriptor;

// Module export bindings
pub mod exports;

// Option schema context
pub mod schema;

pub use descriptor::{
    BuilderFn, COMMAND_FILLER, CommandDescriptor, CommandName, CommandSpec, DEFAULT_SENTINEL,
    Deprecated, Describe, Handler, HandlerFuture, OptionBuilder, ROOT_MARKER,
};
pub use exports::{Binding, ModuleExports};
pub use schema::{OptionSchema, OptionSpec, PositionalSpec};
