// Error type shared by the xkcd and VK clients. Transport failures keep the
// original `reqwest::Error`; a request the VK API answered with an `error`
// object becomes `Error::Remote` so callers can tell the two apart.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} failed with error code: {code} and error message: {message}")]
    Remote {
        method: String,
        code: i64,
        message: String,
    },

    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected {context} response: {reason}")]
    UnexpectedResponse { context: String, reason: String },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unexpected(context: &str, reason: impl Into<String>) -> Self {
        Error::UnexpectedResponse {
            context: context.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the remote API accepted the HTTP request but rejected it
    /// in the response body.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
