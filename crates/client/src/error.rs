//! Unified error handling for gateway interactions.

use thiserror::Error;

/// Errors that can occur when talking to the MediCart gateway.
///
/// The request pipeline classifies and annotates failures but never swallows
/// them; every variant reaches the caller, who owns user-facing messaging.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (network unreachable, TLS, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway rejected the request as unauthenticated (401).
    #[error("Unauthorized: {route}")]
    Unauthorized {
        /// Route that rejected the request.
        route: String,
    },

    /// Gateway rejected the request as forbidden (403).
    #[error("Forbidden: {route}")]
    Forbidden {
        /// Route that rejected the request.
        route: String,
    },

    /// Any other non-success status.
    #[error("Gateway returned {status} on {route}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Route that failed.
        route: String,
        /// Truncated response body.
        message: String,
    },

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(&'static str),

    /// Input rejected before any request was issued.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload rejected because the file exceeds the size limit.
    #[error("File size {size} exceeds {limit} byte limit")]
    FileTooLarge {
        /// Actual file size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: u64,
    },

    /// Session store operation failed.
    #[error("Session store error: {0}")]
    Session(#[from] crate::session::SessionStoreError),
}

impl GatewayError {
    /// HTTP status carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::Forbidden {
            route: "/batches".to_owned(),
        };
        assert_eq!(err.to_string(), "Forbidden: /batches");

        let err = GatewayError::Status {
            status: 500,
            route: "/api/cart".to_owned(),
            message: "boom".to_owned(),
        };
        assert_eq!(err.to_string(), "Gateway returned 500 on /api/cart: boom");
    }

    #[test]
    fn test_status_extraction() {
        assert_eq!(
            GatewayError::Unauthorized {
                route: "/auth/me".to_owned()
            }
            .status(),
            Some(401)
        );
        assert_eq!(
            GatewayError::UnexpectedResponse("missing token").status(),
            None
        );
    }
}
