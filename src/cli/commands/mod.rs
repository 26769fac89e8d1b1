//! Command implementations.

pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod resolve;

pub use completions::CompletionsCommand;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use list::ListCommand;
pub use resolve::ResolveCommand;
