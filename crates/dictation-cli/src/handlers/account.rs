//! Account handlers: register, login, logout and whoami.

use anyhow::Result;

use dictation_core::{PlaybackSettings, Pronunciation};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::utils::input::value_or_prompt;

/// Create an account. Does not sign in.
///
/// The new account's pronunciation follows the system locale.
pub async fn register(ctx: &CliContext, user_id: &str, password: Option<String>) -> Result<()> {
    let password = value_or_prompt(password, "Choose a password")?;
    ctx.auth()
        .register(user_id, &password)
        .await
        .map_err(CliError::from)?;

    let settings = PlaybackSettings {
        pronunciation: Pronunciation::from_locale(&system_locale()),
        ..PlaybackSettings::with_defaults()
    };
    ctx.save_settings(user_id, &settings).await?;

    println!("✓ Registered '{user_id}'. Sign in with 'dictation login {user_id}'.");
    println!("  Pronunciation: {}", settings.pronunciation);
    Ok(())
}

/// Sign in as `user_id`.
pub async fn login(ctx: &CliContext, user_id: &str, password: Option<String>) -> Result<()> {
    let password = value_or_prompt(password, "Password")?;
    let session = ctx
        .auth()
        .login(user_id, &password)
        .await
        .map_err(CliError::from)?;

    let words = ctx.load_words(&session.user_id).await?;
    println!(
        "✓ Signed in as '{}' ({} word(s) in the list).",
        session.user_id,
        words.len()
    );
    Ok(())
}

pub async fn logout(ctx: &CliContext) -> Result<()> {
    let Some(session) = ctx.auth().session() else {
        println!("Not signed in.");
        return Ok(());
    };
    ctx.auth().logout().await.map_err(CliError::from)?;
    println!("✓ Signed out '{}'.", session.user_id);
    Ok(())
}

pub fn whoami(ctx: &CliContext) {
    match ctx.auth().session() {
        Some(session) => println!(
            "{} (signed in {})",
            session.user_id,
            session.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("Not signed in."),
    }
}

/// Locale from `LC_ALL`, `LC_MESSAGES` or `LANG`, without encoding suffix.
fn system_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .map(|value| strip_encoding(&value).to_string())
        .unwrap_or_default()
}

/// `zh_CN.UTF-8` and `zh_CN@euro` both become `zh_CN`.
fn strip_encoding(locale: &str) -> &str {
    locale.split(['.', '@']).next().unwrap_or(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_encoding() {
        assert_eq!(strip_encoding("zh_CN.UTF-8"), "zh_CN");
        assert_eq!(strip_encoding("de_DE@euro"), "de_DE");
        assert_eq!(strip_encoding("C"), "C");
    }

    #[test]
    fn test_locale_maps_to_pronunciation() {
        assert_eq!(
            Pronunciation::from_locale(strip_encoding("zh_HK.UTF-8")),
            Pronunciation::Cantonese
        );
        assert_eq!(
            Pronunciation::from_locale(strip_encoding("en_GB.UTF-8")),
            Pronunciation::English
        );
    }
}
