use std::path::Path;

use thiserror::Error;

use crate::assets::Role;

/// Sound library errors using thiserror for structured error handling.
///
/// The first group of variants are expected rejections: callers surface them
/// as a user-facing message and nothing on disk or in the config has changed.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Sound not found: {0}")]
    NotFound(String),

    #[error("Sound already imported: {0}")]
    DuplicateAsset(String),

    #[error("Sound name reserved for app built-in: {0}")]
    ReservedName(String),

    #[error("Built-in sounds are read-only: {0}")]
    Forbidden(String),

    #[error("Invalid sound name: {0:?}")]
    InvalidName(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Filesystem operation failed on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

impl LibraryError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        LibraryError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// True for rejections that leave all state untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LibraryError::NotFound(_)
                | LibraryError::DuplicateAsset(_)
                | LibraryError::ReservedName(_)
                | LibraryError::Forbidden(_)
                | LibraryError::InvalidName(_)
                | LibraryError::UnsupportedFormat(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load sound configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save sound configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No sound bound to role {0} (setup has not run)")]
    RoleNotBound(Role),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Failed to load audio file: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode audio file: {path}")]
    DecodeFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Audio playback failed")]
    PlaybackFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result alias for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;
