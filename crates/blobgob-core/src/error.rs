//! Error types shared by the client, enumerator and dispatcher.
//!
//! Only [`ConfigError`] is fatal. Everything else is reported and the unit of
//! work it belongs to (container, listing or blob) is skipped.

use thiserror::Error;

/// Bad flags, proxy addresses, endpoints or config files. Aborts before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SOCKS proxy address {addr:?}: {reason}")]
    Proxy { addr: String, reason: String },

    #[error("invalid endpoint {0:?}")]
    Endpoint(String),

    #[error("config file {path}: {reason}")]
    File { path: String, reason: String },
}

/// A request could not be completed (connect, TLS, proxy, timeout, ...).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(#[from] pub curl::Error);

impl TransportError {
    /// True if the client-wide request timeout expired.
    pub fn is_timeout(&self) -> bool {
        self.0.is_operation_timedout()
    }
}

/// Why a container listing produced no usable result.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("listing request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("listing returned HTTP {code}")]
    Status { code: u32, body: String },

    #[error("malformed listing document: {message}")]
    Decode { message: String, body: String },
}

impl From<curl::Error> for ListError {
    fn from(e: curl::Error) -> Self {
        ListError::Transport(TransportError(e))
    }
}

impl ListError {
    /// Raw response body, when the server sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            ListError::Transport(_) => None,
            ListError::Status { body, .. } | ListError::Decode { body, .. } => Some(body),
        }
    }
}

/// Failure of a single blob download. Never affects other downloads.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("HTTP {0}")]
    Status(u32),

    #[error("create {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// True if the transfer was cut off by the request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DownloadError::Transport(e) if e.is_timeout())
    }
}

impl From<curl::Error> for DownloadError {
    fn from(e: curl::Error) -> Self {
        DownloadError::Transport(TransportError(e))
    }
}
