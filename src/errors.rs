use std::path::PathBuf;

use thiserror::Error;

/// Every failure the request engine can report for a single command.
#[derive(Error, Debug)]
pub enum JurlError {
    /// Bad grammar, duplicate or unknown flags, invalid json body, invalid ordinal.
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// The destination could not be turned into a url; nothing was sent.
    #[error("invalid destination address: {0}")]
    InvalidDestination(String),

    #[error("destination address can't be reached: {0}")]
    Unreachable(String),

    #[error("{context} ({}): {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("saved requests store is corrupt: {0}")]
    CorruptStore(String),
}

impl JurlError {
    pub fn parse(msg: impl Into<String>) -> JurlError {
        JurlError::Parse(msg.into())
    }

    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> JurlError {
        JurlError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, JurlError>;
