use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by a [`crate::SimApi`] implementation.
///
/// Transport details (timeouts, TLS, auth) are collapsed into
/// `Transport`; the pipeline treats every variant as an opaque stage
/// failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Resource not found: {what}")]
    NotFound { what: String },
}
