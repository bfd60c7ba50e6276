//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use dictation_core::paths::DATA_DIR_ENV;

use crate::commands::Commands;

/// Command-line interface for practising dictation.
///
/// Global options apply to every subcommand.
#[derive(Parser)]
#[command(name = "dictation")]
#[command(about = "Practise dictation: manage a word list and have it read aloud")]
#[command(version)]
pub struct Cli {
    /// Override the data directory for this invocation
    #[arg(long = "data-dir", env = DATA_DIR_ENV, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["dictation", "--verbose", "--data-dir", "/tmp/words", "list"]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/words")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["dictation", "list", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_no_command_is_allowed() {
        let cli = Cli::parse_from(["dictation"]);
        assert!(cli.command.is_none());
    }
}
