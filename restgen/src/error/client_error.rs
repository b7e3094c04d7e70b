//! Request execution errors.

use thiserror::Error;

/// Errors raised while a generated client executes a request.
///
/// Every generated method surfaces these through its error channel: a
/// `Result<_, E>` return maps them with `E: From<ClientError>`, a
/// [`Task`](crate::Task) carries them directly.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The request's cancellation token fired before a response arrived.
    #[error("Request cancelled")]
    Cancelled,

    /// The request payload could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// The response body could not be decoded into the expected type.
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// The base URL and request path do not form a valid URL.
    #[error("Invalid URL `{url}`: {message}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser error message.
        message: String,
    },

    /// A configured header name or value is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A blocking call could not start an async runtime.
    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl ClientError {
    /// Returns `true` if this error is retryable.
    ///
    /// Transport-level timeouts and connection failures are retryable,
    /// HTTP status errors only for 5xx and 429.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns the HTTP status code if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_500_is_retryable() {
        let err = ClientError::HttpStatus {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_429_is_retryable() {
        let err = ClientError::HttpStatus {
            status: 429,
            message: "Too Many Requests".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_400_not_retryable() {
        let err = ClientError::HttpStatus {
            status: 400,
            message: "Bad Request".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_cancelled_is_not_retryable() {
        assert!(!ClientError::Cancelled.is_retryable());
        assert!(ClientError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_status_code_extraction() {
        let err = ClientError::HttpStatus {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(ClientError::Decode("eof".into()).status_code(), None);
    }

    #[test]
    fn test_display() {
        let err = ClientError::InvalidUrl {
            url: "nope".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid URL `nope`: relative URL without a base"
        );
    }
}
