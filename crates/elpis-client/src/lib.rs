//! Client library for the Elpis speech transcription server.
//!
//! Elpis exposes a REST API where every call returns a JSON envelope of the
//! form `{"status": <int>, "data": <object or string>}`. This crate provides
//! the [`Elpis`] client with one typed async method per API operation, plus
//! the [`Response`] envelope type for callers that want the raw result.
//!
//! Operations cover the four stages of the transcription pipeline: datasets
//! (training data), pronunciation dictionaries, model training, and
//! transcription of new recordings.

mod client;
mod response;

pub use client::{Elpis, ElpisConfig};
pub use response::Response;
use thiserror::Error;

/// Errors that can occur when talking to an Elpis server.
#[derive(Debug, Error)]
pub enum ElpisError {
    /// The base URL could not be parsed at client construction.
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a usable response (connection refused,
    /// timeout, I/O failure). Never retried.
    #[error("communication error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered but reported a failure, either at the transport
    /// level or in the envelope's `status` field.
    #[error("{}", .0.error_detail().unwrap_or_else(|| "server error (no detail)".into()))]
    Api(Box<Response>),

    /// A success envelope whose `data` did not have the documented shape.
    #[error("unexpected response payload: {0}")]
    UnexpectedPayload(String),

    /// The operation exists in the Elpis API but is not yet supported by
    /// this client.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl ElpisError {
    /// The failure envelope, when this error came from a server response.
    pub fn response(&self) -> Option<&Response> {
        match self {
            ElpisError::Api(response) => Some(response),
            _ => None,
        }
    }
}

/// Result type for Elpis operations.
pub type Result<T> = std::result::Result<T, ElpisError>;
