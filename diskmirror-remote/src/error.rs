//! Error types for diskmirror-remote.

use std::path::PathBuf;

use thiserror::Error;

/// Longest response body kept in [`RemoteError::Http`].
const MAX_BODY_CHARS: usize = 512;

/// All errors that a single remote operation can produce.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The API answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// DNS, connect, TLS or timeout failure; no usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The upload-link response carried no `href`.
    #[error("no upload URL received for {name}")]
    MissingUploadUrl { name: String },

    /// A response body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The local file to upload could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A name or path that cannot address a child of the bound folder.
    #[error("invalid remote path: {0}")]
    InvalidPath(String),
}

impl From<ureq::Error> for RemoteError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                RemoteError::Http {
                    status,
                    body: body.chars().take(MAX_BODY_CHARS).collect(),
                }
            }
            ureq::Error::Transport(transport) => RemoteError::Transport(transport.to_string()),
        }
    }
}

/// Convenience constructor for [`RemoteError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RemoteError {
    RemoteError::Io {
        path: path.into(),
        source,
    }
}
