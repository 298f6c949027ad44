//! Error types for eBay OAuth and API operations

/// Errors from option validation, token requests and application calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required option is missing or malformed. Raised before any request.
    #[error("configuration error: {field} {message}")]
    Configuration {
        field: &'static str,
        message: String,
    },

    /// The token endpoint answered with a non-success status.
    ///
    /// `body` is the raw response text, unmodified, so callers can match on
    /// provider error codes such as `invalid_grant`. `reason` is the canonical
    /// phrase for `status`, not whatever phrase the server sent.
    #[error("eBay OAuth request failed: {status} {reason}\n{body}")]
    TokenRequest {
        status: u16,
        reason: String,
        body: String,
    },

    /// A non-token API call answered with a non-success status.
    #[error("eBay API request failed: {status}")]
    HttpStatus { status: u16 },

    /// A success response carried a body that does not match the expected shape.
    #[error("invalid response body: {0}")]
    Deserialization(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("application client used before a successful initialize()")]
    NotInitialized,
}

impl Error {
    pub(crate) fn config(field: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            message: message.into(),
        }
    }

    /// Map a reqwest failure, keeping timeouts distinguishable from other
    /// transport errors.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Transport(format!("{context}: {err}"))
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TokenRequest { status, .. } | Self::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias for eBay client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_request_message_carries_status_and_body() {
        let err = Error::TokenRequest {
            status: 400,
            reason: "Bad Request".into(),
            body: r#"{"error":"invalid_grant"}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("request failed: 400"), "got: {msg}");
        assert!(msg.contains("Bad Request"), "got: {msg}");
        assert!(msg.contains("invalid_grant"), "got: {msg}");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn configuration_message_names_field() {
        let err = Error::config("client_id", "is required");
        assert_eq!(err.to_string(), "configuration error: client_id is required");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn error_debug_includes_variant() {
        let debug = format!("{:?}", Error::HttpStatus { status: 503 });
        assert!(
            debug.contains("HttpStatus"),
            "Debug should include variant name, got: {debug}"
        );
    }
}
