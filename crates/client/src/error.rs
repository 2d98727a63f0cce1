//! Errors from the notes API layer.

/// Errors returned by [`NotesApi`](crate::api::NotesApi) implementations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout) or the
    /// response body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the credential (401), or no credential was
    /// available to send.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("credential rejected"))]
    Unauthorized {
        /// Server-provided message, if any.
        message: Option<String>,
    },

    /// The server returned a non-2xx status other than 401.
    #[error("Notes API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, if any.
        message: Option<String>,
    },
}

/// Convenience alias for API call results.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Whether this is an authorization failure (401-class).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The human-readable message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Api { message, .. } => message.as_deref(),
            Self::Request(_) => None,
        }
    }

    /// HTTP status code for responses the server actually answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_api_error_with_message() {
        let err = ApiError::Api {
            status: 404,
            message: Some("Note not found".to_string()),
        };
        assert_eq!(err.to_string(), "Notes API error (404): Note not found");
    }

    #[test]
    fn display_api_error_without_message() {
        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "Notes API error (500): no message");
    }

    #[test]
    fn unauthorized_is_distinguished() {
        let err = ApiError::Unauthorized { message: None };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Unauthorized: credential rejected");

        let other = ApiError::Api {
            status: 403,
            message: None,
        };
        assert!(!other.is_unauthorized());
    }

    #[test]
    fn server_message_exposed() {
        let err = ApiError::Unauthorized {
            message: Some("Token expired".to_string()),
        };
        assert_eq!(err.server_message(), Some("Token expired"));
    }

    #[test]
    fn request_error_has_no_server_message() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = ApiError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
        assert_eq!(err.server_message(), None);
    }
}
