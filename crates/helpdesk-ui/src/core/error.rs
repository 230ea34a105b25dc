//! Error taxonomy for the request gateway and the comment channel.
//!
//! # Design
//! - One enum covers every failure the UI layer has to distinguish, so
//!   call sites match on variants instead of string-probing messages.
//! - Token-rejection classification lives here, DOM-free, because the
//!   retry protocol hangs off it and it must be testable on the host.

use crate::core::refresh::RefreshError;

/// Failure surfaced by the gateway or the comment channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// No usable credential at call time; no network attempt was made.
    Unauthenticated,
    /// Credential failed structural validation.
    MalformedToken,
    /// Login rejected by the server.
    InvalidCredentials(String),
    /// Authorization still rejected after the single refresh-and-retry.
    AuthRejected {
        /// HTTP status of the rejection.
        status: u16,
        /// Server-provided rejection message.
        message: String,
    },
    /// The shared refresh attempt failed; the session was cleared.
    RefreshFailed(String),
    /// The comment channel is not open.
    ChannelNotConnected,
    /// Any other non-2xx response.
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the status text.
        message: String,
    },
    /// Transport-level failure before a status was received.
    Network(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::MalformedToken => write!(f, "malformed token"),
            Self::InvalidCredentials(message) => write!(f, "login rejected: {message}"),
            Self::AuthRejected { status, message } => {
                write!(f, "authorization rejected ({status}): {message}")
            }
            Self::RefreshFailed(message) => write!(f, "session refresh failed: {message}"),
            Self::ChannelNotConnected => write!(f, "comment channel is not connected"),
            Self::Http { status, message } => write!(f, "http {status}: {message}"),
            Self::Network(message) => write!(f, "network error: {message}"),
        }
    }
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        Self::RefreshFailed(err.message)
    }
}

/// Whether a failed attempt may refresh and retry.
///
/// Only an authorization rejection qualifies, and only while the call has
/// not spent its single retry; a second rejection surfaces to the caller.
#[must_use]
pub const fn should_refresh_and_retry(error: &ApiError, refreshed: bool) -> bool {
    !refreshed && matches!(error, ApiError::AuthRejected { .. })
}

/// Whether a response is an authorization rejection that warrants the
/// refresh-and-retry protocol (expired, invalid or malformed credential).
#[must_use]
pub fn is_token_rejection(status: u16, message: &str) -> bool {
    if status != 401 {
        return false;
    }
    let message = message.to_ascii_lowercase();
    message.contains("expired") || message.contains("invalid") || message.contains("malformed")
}

#[cfg(test)]
mod tests {
    use super::{ApiError, is_token_rejection, should_refresh_and_retry};
    use crate::core::refresh::RefreshError;

    fn rejection() -> ApiError {
        ApiError::AuthRejected {
            status: 401,
            message: "Invalid token: token is expired".into(),
        }
    }

    #[test]
    fn rejection_requires_401_and_a_token_message() {
        assert!(is_token_rejection(401, "Invalid token: token is expired"));
        assert!(is_token_rejection(401, "Invalid Authorization header format"));
        assert!(is_token_rejection(401, "Malformed token"));
        assert!(!is_token_rejection(401, "password mismatch"));
        assert!(!is_token_rejection(403, "invalid token"));
        assert!(!is_token_rejection(500, "token is expired"));
    }

    #[test]
    fn refresh_error_maps_to_refresh_failed() {
        let err: ApiError = RefreshError::new("401").into();
        assert_eq!(err, ApiError::RefreshFailed("401".into()));
    }

    #[test]
    fn only_an_unspent_auth_rejection_refreshes() {
        assert!(should_refresh_and_retry(&rejection(), false));
        assert!(!should_refresh_and_retry(&rejection(), true));
        assert!(!should_refresh_and_retry(
            &ApiError::Http {
                status: 500,
                message: "boom".into()
            },
            false
        ));
        assert!(!should_refresh_and_retry(&ApiError::Unauthenticated, false));
    }

    #[test]
    fn second_rejection_after_a_refresh_surfaces() {
        // Drive the gateway's per-call protocol over scripted attempt
        // outcomes: rejected, refreshed, rejected again.
        let mut refreshed = false;
        let mut surfaced = None;
        for outcome in [rejection(), rejection()] {
            if should_refresh_and_retry(&outcome, refreshed) {
                refreshed = true;
            } else {
                surfaced = Some(outcome);
                break;
            }
        }
        assert!(refreshed);
        assert!(matches!(surfaced, Some(ApiError::AuthRejected { .. })));
    }

    #[test]
    fn display_covers_the_taxonomy() {
        assert_eq!(ApiError::Unauthenticated.to_string(), "not authenticated");
        assert_eq!(
            ApiError::ChannelNotConnected.to_string(),
            "comment channel is not connected"
        );
        assert!(
            ApiError::Http {
                status: 502,
                message: "bad gateway".into()
            }
            .to_string()
            .contains("502")
        );
    }
}
