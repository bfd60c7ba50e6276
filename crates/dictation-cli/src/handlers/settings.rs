//! Settings command handler.

use anyhow::Result;

use dictation_core::{PlaybackSettings, validate_settings};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::settings_commands::SettingsCommand;
use crate::utils::input;
use crate::utils::presentation::format_settings;

/// Execute the settings command.
pub async fn execute(ctx: &CliContext, command: SettingsCommand) -> Result<()> {
    let user = ctx.require_user()?;
    match command {
        SettingsCommand::Show => {
            let settings = ctx.load_settings(&user).await?;
            println!("{}", format_settings(&settings));
        }
        SettingsCommand::Set { .. } => {
            let update = command.as_update().unwrap_or_default();
            if update.is_empty() {
                return Err(CliError::Arguments(
                    "nothing to change; pass at least one option".to_string(),
                )
                .into());
            }
            let mut settings = ctx.load_settings(&user).await?;
            settings.merge(&update);
            validate_settings(&settings).map_err(|e| CliError::Config(e.to_string()))?;
            ctx.save_settings(&user, &settings).await?;

            println!("✓ Settings updated:\n{}", format_settings(&settings));
        }
        SettingsCommand::Reset { force } => {
            if !force && !input::prompt_confirmation("Reset all settings to defaults?")? {
                println!("Reset cancelled.");
                return Ok(());
            }
            let defaults = PlaybackSettings::with_defaults();
            ctx.save_settings(&user, &defaults).await?;
            println!("✓ Settings reset:\n{}", format_settings(&defaults));
        }
    }
    Ok(())
}
