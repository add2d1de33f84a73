//! Crate-wide error type.

/// Errors surfaced by the compliance aggregator and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tally store error: {message}")]
    Storage { message: String },

    #[error("Invalid media: {reason}")]
    InvalidMedia { reason: String },

    #[error("Notification error: {message}")]
    Notification { message: String },

    #[error("Session already closed")]
    SessionClosed,
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Storage {
            message: e.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
