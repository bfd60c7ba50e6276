//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Validate CLI-specific input, go through the [`CliContext`] for stores
//!   and audio, and format the result for the terminal.
//!
//! Word-list and settings commands require a signed-in user and persist
//! their change before returning.
//!
//! [`CliContext`]: crate::bootstrap::CliContext

pub mod account;
pub mod add;
pub mod clear;
pub mod export;
pub mod import;
pub mod list;
pub mod play;
pub mod remove;
pub mod settings;
pub mod voices;
