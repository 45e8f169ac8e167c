//! Error type shared by every client operation.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-2xx status. The full response body is
    /// kept so server-side diagnostics survive.
    #[error("{status} for url: {url}\nResponse: {body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// Network or decode failure from the HTTP transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A request payload could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Reading a PDF from disk failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a PDF from a caller-supplied stream failed.
    #[error("failed to read pdf stream: {0}")]
    Stream(#[source] std::io::Error),

    /// A credential could not be encoded as a header value.
    #[error("invalid value for header {name}")]
    InvalidHeader { name: &'static str },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status of a failed response, if the failure came from the service.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Raw response body of a failed response.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}
