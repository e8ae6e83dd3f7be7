//! Library error types.
//!
//! Every call either fully succeeds or fails with exactly one [`Error`].
//! Nothing here is logged, swallowed, or retried; errors go straight back
//! to the caller. The binary wraps these in `anyhow` for reporting.
//!
//! # Example
//!
//! ```ignore
//! match client.call::<Session>(&endpoint::AUTH_GET_SESSION, &creds, &args).await {
//!     Ok(session) => creds.set_session_key(session.key),
//!     Err(Error::Api(e)) if e.kind() == ApiErrorKind::UnauthorizedToken => {
//!         eprintln!("token not authorized yet");
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::fmt;

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A session-signed call was attempted without a session key.
    /// Raised before any network I/O.
    #[error("Session key is required for this call; authenticate first")]
    AuthRequired,

    /// An argument value has a shape the normalizer cannot encode.
    #[error("Invalid type of argument: {name}")]
    InvalidArgumentType { name: String },

    /// Connection or read failure in the transport.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status whose body was not a service envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body is not a well-formed envelope.
    #[error("Malformed response: {0}")]
    Format(String),

    /// The service reported a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Envelope was fine, but the payload did not fit the requested type.
    #[error("Failed to decode response payload: {0}")]
    Decode(String),
}

impl Error {
    /// Create an invalid-argument-type error for parameter `name`.
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgumentType { name: name.into() }
    }

    /// Create an HTTP status error, keeping only the head of the body.
    pub fn http(status: u16, body: &[u8]) -> Self {
        Self::Http {
            status,
            body: String::from_utf8_lossy(body).chars().take(200).collect(),
        }
    }

    /// The remote error, if the service reported one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Failure reported by the service itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error {code}: {message}")]
pub struct ApiError {
    /// Numeric code from the service's error table
    pub code: i32,
    /// Human-readable message, as sent
    pub message: String,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Classify the code against the service's published error table.
    pub fn kind(&self) -> ApiErrorKind {
        ApiErrorKind::from_code(self.code)
    }

    /// Whether the service flagged the failure as transient.
    ///
    /// The library never retries; this only informs caller policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ApiErrorKind::ServiceOffline
                | ApiErrorKind::TemporarilyUnavailable
                | ApiErrorKind::RateLimitExceeded
        )
    }
}

/// Well-known service error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidService,
    InvalidMethod,
    AuthenticationFailed,
    InvalidFormat,
    InvalidParameters,
    InvalidResource,
    OperationFailed,
    InvalidSessionKey,
    InvalidApiKey,
    ServiceOffline,
    InvalidSignature,
    UnauthorizedToken,
    TokenExpired,
    TemporarilyUnavailable,
    SuspendedApiKey,
    RateLimitExceeded,
    Other(i32),
}

impl ApiErrorKind {
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::InvalidService,
            3 => Self::InvalidMethod,
            4 => Self::AuthenticationFailed,
            5 => Self::InvalidFormat,
            6 => Self::InvalidParameters,
            7 => Self::InvalidResource,
            8 => Self::OperationFailed,
            9 => Self::InvalidSessionKey,
            10 => Self::InvalidApiKey,
            11 => Self::ServiceOffline,
            13 => Self::InvalidSignature,
            14 => Self::UnauthorizedToken,
            15 => Self::TokenExpired,
            16 => Self::TemporarilyUnavailable,
            26 => Self::SuspendedApiKey,
            29 => Self::RateLimitExceeded,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "error {code}"),
            kind => write!(f, "{kind:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::from(ApiError::new(6, "Invalid parameters"));
        let msg = err.to_string();
        assert!(msg.contains('6'));
        assert!(msg.contains("Invalid parameters"));
    }

    #[test]
    fn test_api_error_kind() {
        assert_eq!(ApiError::new(9, "").kind(), ApiErrorKind::InvalidSessionKey);
        assert_eq!(ApiError::new(13, "").kind(), ApiErrorKind::InvalidSignature);
        assert_eq!(ApiError::new(99, "").kind(), ApiErrorKind::Other(99));
    }

    #[test]
    fn test_retryable_codes() {
        assert!(ApiError::new(11, "offline").is_retryable());
        assert!(ApiError::new(16, "busy").is_retryable());
        assert!(ApiError::new(29, "slow down").is_retryable());
        assert!(!ApiError::new(6, "bad params").is_retryable());
    }

    #[test]
    fn test_http_error_truncates_body() {
        let body = vec![b'x'; 1000];
        match Error::http(502, &body) {
            Error::Http { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), 200);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_as_api() {
        assert!(Error::AuthRequired.as_api().is_none());
        let err = Error::Api(ApiError::new(4, "nope"));
        assert_eq!(err.as_api().map(|e| e.code), Some(4));
    }
}
