//! Settings management subcommands.

use clap::Subcommand;

use dictation_core::{Pronunciation, SettingsUpdate};

/// Settings command variants.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show the current playback settings
    Show,
    /// Update playback settings; omitted options keep their value
    Set {
        /// Times each word is read (1-20)
        #[arg(long)]
        repetitions: Option<u32>,
        /// Pause between readings, in seconds (0-60)
        #[arg(long)]
        interval: Option<f32>,
        /// Speech rate multiplier (0.1-10.0)
        #[arg(long)]
        speed: Option<f32>,
        /// English, Cantonese or Mandarin
        #[arg(long)]
        pronunciation: Option<Pronunciation>,
    },
    /// Reset all settings to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl SettingsCommand {
    /// The partial update carried by `set`, if this is one.
    pub const fn as_update(&self) -> Option<SettingsUpdate> {
        match *self {
            Self::Set {
                repetitions,
                interval,
                speed,
                pronunciation,
            } => Some(SettingsUpdate {
                repetitions,
                interval,
                speed,
                pronunciation,
            }),
            _ => None,
        }
    }
}
