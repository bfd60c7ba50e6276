//! Top-level subcommands.

use std::path::PathBuf;

use clap::Subcommand;

use crate::settings_commands::SettingsCommand;

/// Environment variable read for passwords so scripts need not prompt.
pub const PASSWORD_ENV: &str = "DICTATION_PASSWORD";

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new account
    Register {
        /// Account name (letters, digits, '-', '_' and '.')
        user_id: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in; word lists and settings are per account
    Login {
        /// Account name
        user_id: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Append words to the list
    Add {
        /// Words to add; each argument may hold several lines
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
        /// Recorded clip to play instead of speech (single word only)
        #[arg(long, value_name = "FILE")]
        audio: Option<PathBuf>,
    },
    /// Append every line of a text file to the list
    Import {
        /// UTF-8 text file, one word per line
        file: PathBuf,
    },
    /// Show the word list
    List,
    /// Delete one word by its 1-based position
    Remove {
        /// Position as shown by `list`
        position: usize,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Delete every word
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Write the list to a text file, one word per line
    Export {
        /// Output file (defaults to dictation_words.txt in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// View or change playback settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// List the speech engine's voices and which one each pronunciation uses
    Voices,
    /// Read the list aloud
    Play {
        /// 1-based position to start from
        #[arg(long, value_name = "POSITION")]
        from: Option<usize>,
        /// Control playback from the keyboard
        #[arg(short, long)]
        interactive: bool,
        /// Load recorded clips into memory before starting
        #[arg(long)]
        preload: bool,
    },
}
