//! CLI-specific error types and mappings.
//!
//! Maps domain errors onto exit codes and user-facing messages.

use dictation_core::{AuthError, CoreError, RepositoryError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Argument error (bad position, unknown value, ...).
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Command needs a signed-in user.
    #[error("Not signed in. Run 'dictation login <user>' first.")]
    NotSignedIn,

    /// Wrong credentials or account problems.
    #[error("{0}")]
    Auth(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Settings validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2,                 // EX_USAGE
            Self::NotSignedIn | Self::Auth(_) => 77, // EX_NOPERM
            Self::Io(_) => 74,                       // EX_IOERR
            Self::Config(_) => 78,                   // EX_CONFIG
            Self::Storage(_) => 73,                  // EX_CANTCREAT
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::Settings(settings_err) => Self::Config(settings_err.to_string()),
            CoreError::Word(word_err) => Self::Arguments(word_err.to_string()),
            CoreError::Auth(auth_err) => auth_err.into(),
            CoreError::Path(path_err) => Self::Storage(path_err.to_string()),
        }
    }
}

impl From<AuthError> for CliError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated => Self::NotSignedIn,
            AuthError::InvalidUserId(_) => Self::Arguments(err.to_string()),
            AuthError::Storage(msg) => Self::Storage(msg),
            AuthError::InvalidCredentials | AuthError::UserExists(_) => Self::Auth(err.to_string()),
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
