//! Command-line adapter for dictation practice.
//!
//! [`bootstrap`] is the composition root: it opens the file stores and hands
//! command handlers a [`CliContext`]. Handlers build the playback machinery
//! only when a command actually needs audio.

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod settings_commands;
pub mod utils;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
pub use settings_commands::SettingsCommand;
