use thiserror::Error;

/// All errors that can occur when talking to the Animoto API.
#[derive(Error, Debug)]
pub enum AnimotoError {
    /// The HTTP exchange did not complete (connection refused, timeout,
    /// malformed framing, a failing interceptor).
    #[error("HTTP exchange failed: {0}")]
    Http(#[from] TransportError),

    /// The server answered, but not with the status code the operation expects.
    #[error("expected HTTP {expected} but the server responded with {status}")]
    HttpExpectation {
        expected: u16,
        status: u16,
        body: String,
    },

    /// The server answered with the expected status, but the body does not
    /// match the documented schema.
    #[error("response violated the API contract: {message}")]
    Contract { message: String, body: String },

    /// A request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `reload` was called on a resource the server has not located yet.
    #[error("resource has no location; submit it before reloading")]
    MissingLocation,

    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AnimotoError {
    /// HTTP status carried by an [`AnimotoError::HttpExpectation`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpExpectation { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures raised by an [`HttpTransport`](crate::HttpTransport) before a
/// response is available.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error reported by reqwest.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// I/O-level failure reported by a non-reqwest transport.
    #[error("I/O error: {0}")]
    Io(String),

    /// A request interceptor refused to let the request through.
    #[error("interceptor rejected request: {0}")]
    Interceptor(String),
}

/// A convenience alias for `Result<T, AnimotoError>`.
pub type Result<T> = std::result::Result<T, AnimotoError>;
