//! Unified error types.

use std::path::PathBuf;

use thiserror::Error;

/// The error type returned by mirrorlist's fallible startup operations.
///
/// Application-level errors (404, 500, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: bad configuration, binding to a port, accepting a
/// connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("link preview could not be rendered: {0}")]
    Template(#[from] askama::Error),
}

/// Why the backing mirror resource could not be turned into a mirror list.
///
/// Both variants become a `500` with a generic body; the detail only ever
/// reaches the log.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mirror resource {path} is unavailable: {source}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mirror resource {path} is malformed: {source}")]
    MalformedData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
