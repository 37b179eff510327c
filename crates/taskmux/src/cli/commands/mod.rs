//! CLI commands

mod completions;
mod init;
mod list;
mod run;

pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use run::RunCommand;
