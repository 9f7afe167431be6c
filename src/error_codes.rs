//! Error codes for structured failure reporting by Mercury collaborators.
//!
//! Identity providers and signaling channels attach these codes to the
//! errors they return so applications can react without parsing messages.
//! They serialize using `SCREAMING_SNAKE_CASE` to match the cloud service's
//! JSON format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error codes reported by the Mercury cloud service.
///
/// The service sends these as `"SCREAMING_SNAKE_CASE"` strings
/// (e.g., `"INVALID_CREDENTIALS"`).
///
/// Use [`description()`](ErrorCode::description) for a human-readable explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Application errors
    InvalidAppId,
    InvalidAppKey,
    AppSuspended,

    // Login errors
    InvalidCredentials,
    InvalidToken,
    TokenExpired,
    AccountLocked,
    AlreadyLoggedIn,

    // Signaling errors
    ConnectionRefused,
    ConnectionLost,
    RateLimitExceeded,

    // Service errors
    InternalError,
    ServiceUnavailable,
}

impl ErrorCode {
    /// Returns a human-readable description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidAppId => {
                "The provided application ID is not recognized. Verify your app ID is correct."
            }
            Self::InvalidAppKey => "The application key does not match the application ID.",
            Self::AppSuspended => {
                "The application has been suspended. Contact the administrator for assistance."
            }
            Self::InvalidCredentials => "The user account or token was rejected.",
            Self::InvalidToken => {
                "The authentication token is invalid or malformed. Please obtain a new token."
            }
            Self::TokenExpired => "The authentication token has expired. Please obtain a new token.",
            Self::AccountLocked => "The user account is locked and cannot log in.",
            Self::AlreadyLoggedIn => "The user account already has an active session.",
            Self::ConnectionRefused => "The signaling service refused the connection.",
            Self::ConnectionLost => "The connection to the signaling service was lost.",
            Self::RateLimitExceeded => {
                "Too many requests in a short time. Please slow down and try again later."
            }
            Self::InternalError => {
                "An internal service error occurred. Please try again or contact support if the issue persists."
            }
            Self::ServiceUnavailable => {
                "The service is temporarily unavailable. Please try again in a few moments."
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::InvalidCredentials).unwrap();
        assert_eq!(json, "\"INVALID_CREDENTIALS\"");

        let code: ErrorCode = serde_json::from_str("\"TOKEN_EXPIRED\"").unwrap();
        assert_eq!(code, ErrorCode::TokenExpired);
    }

    #[test]
    fn display_uses_description() {
        assert_eq!(
            ErrorCode::AccountLocked.to_string(),
            ErrorCode::AccountLocked.description()
        );
    }
}
