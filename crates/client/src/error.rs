//! Error types for API interactions.
//!
//! Errors are terminal at the synchronizer boundary: stores record a display
//! message, while library callers receive the structured [`ApiError`].

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when interacting with the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The server answered with a non-success HTTP status. Carries the
    /// body's failure message when the body had one.
    #[error("HTTP {code}: {}", message.as_deref().unwrap_or("no error details"))]
    Status {
        /// The HTTP status code.
        code: StatusCode,
        /// Failure message from the response body, if present.
        message: Option<String>,
    },

    /// A 2xx response whose envelope lacked both success markers.
    #[error("{}", message.as_deref().unwrap_or("request rejected by server"))]
    Rejected {
        /// The server's failure message, if it supplied one.
        message: Option<String>,
    },

    /// The operation requires an authenticated session and none is present.
    #[error("not signed in")]
    NotSignedIn,
}

impl ApiError {
    /// The server-supplied failure message, if this error carries one.
    ///
    /// Synthetic descriptions (status-code text, transport errors) do not
    /// count - callers fall back to their own generic message for those.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_server_message() {
        let err = ApiError::Rejected {
            message: Some("No cart exists".into()),
        };
        assert_eq!(err.to_string(), "No cart exists");
        assert_eq!(err.server_message(), Some("No cart exists"));
    }

    #[test]
    fn bare_status_has_no_server_message() {
        let err = ApiError::Status {
            code: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: no error details");
    }

    #[test]
    fn status_with_body_message_surfaces_it() {
        let err = ApiError::Status {
            code: StatusCode::UNAUTHORIZED,
            message: Some("Expired token".into()),
        };
        assert_eq!(err.server_message(), Some("Expired token"));
    }
}
