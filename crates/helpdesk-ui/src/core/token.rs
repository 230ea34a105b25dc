//! Bearer token validation and claims decoding.
//!
//! # Design
//! - A credential is either well-formed (three non-empty dot-delimited
//!   segments) or rejected outright; malformed tokens are never stored,
//!   decoded further, or sent to the server.
//! - Decoding parses the payload segment into a strict schema; a shape
//!   mismatch is a hard failure, never optimistic field access.
//! - The signature is never verified client-side; the server re-validates
//!   every call, so only structural shape is checked here.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use helpdesk_api_models::UserClaims;
use serde::Deserialize;

/// Refresh when the token expires within this many seconds.
pub const REFRESH_HORIZON_SECS: i64 = 300;

/// Structural or schema failure while handling a credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Token does not split into exactly three non-empty segments.
    Malformed,
    /// Payload segment is not base64url JSON matching the claims schema.
    UndecodablePayload,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::UndecodablePayload => write!(f, "undecodable token payload"),
        }
    }
}

/// Claims and expiry decoded from a well-formed credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedToken {
    /// Identity attributes carried by the token.
    pub claims: UserClaims,
    /// Expiration instant in epoch seconds.
    pub expires_at: i64,
}

#[derive(Deserialize)]
struct TokenPayload {
    #[serde(rename = "Data")]
    data: TokenIdentity,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenIdentity {
    id: String,
    username: String,
    role: String,
    #[serde(default)]
    belong: Vec<String>,
}

/// Whether the token has the three non-empty dot-delimited segments of a JWT.
#[must_use]
pub fn is_well_formed(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 3 && parts.iter().all(|part| !part.is_empty())
}

/// Decode claims and expiry from the payload segment of a credential.
///
/// # Errors
/// Returns [`TokenError::Malformed`] when the token fails [`is_well_formed`],
/// or [`TokenError::UndecodablePayload`] when the payload segment is not
/// base64url JSON matching the expected claims shape.
pub fn decode(token: &str) -> Result<DecodedToken, TokenError> {
    if !is_well_formed(token) {
        return Err(TokenError::Malformed);
    }
    let segment = token.split('.').nth(1).ok_or(TokenError::Malformed)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| TokenError::UndecodablePayload)?;
    let payload: TokenPayload =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::UndecodablePayload)?;
    Ok(DecodedToken {
        claims: UserClaims {
            id: payload.data.id,
            username: payload.data.username,
            role: payload.data.role,
            tenants: payload.data.belong,
        },
        expires_at: payload.exp,
    })
}

/// Whether a token expiring at `expires_at` should be refreshed at `now`.
///
/// True when already expired or expiring within [`REFRESH_HORIZON_SECS`].
#[must_use]
pub const fn needs_refresh(expires_at: i64, now: i64) -> bool {
    now >= expires_at - REFRESH_HORIZON_SECS
}

#[cfg(test)]
mod tests {
    use super::{REFRESH_HORIZON_SECS, TokenError, decode, is_well_formed, needs_refresh};
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_with_payload(json: &str) -> String {
        format!("header.{}.signature", URL_SAFE_NO_PAD.encode(json))
    }

    #[test]
    fn well_formed_requires_three_non_empty_segments() {
        assert!(is_well_formed("a.b.c"));
        assert!(!is_well_formed("a.b"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("a..c"));
        assert!(!is_well_formed(".b.c"));
        assert!(!is_well_formed("a.b.c.d"));
    }

    #[test]
    fn decode_extracts_claims_and_expiry() {
        let token = token_with_payload(
            r#"{"Data":{"id":"u1","username":"ada","role":"Admin","belong":["t1","t2"]},"exp":1900000000}"#,
        );
        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.claims.id, "u1");
        assert_eq!(decoded.claims.role, "Admin");
        assert_eq!(decoded.claims.tenants, vec!["t1", "t2"]);
        assert_eq!(decoded.expires_at, 1_900_000_000);
    }

    #[test]
    fn decode_defaults_missing_tenant_memberships() {
        let token = token_with_payload(
            r#"{"Data":{"id":"u1","username":"ada","role":"Customer"},"exp":10}"#,
        );
        assert!(decode(&token).unwrap().claims.tenants.is_empty());
    }

    #[test]
    fn decode_rejects_malformed_tokens_without_decoding() {
        assert_eq!(decode("a.b"), Err(TokenError::Malformed));
        assert_eq!(decode(""), Err(TokenError::Malformed));
    }

    #[test]
    fn decode_rejects_schema_mismatch() {
        let missing_identity = token_with_payload(r#"{"exp":10}"#);
        assert_eq!(
            decode(&missing_identity),
            Err(TokenError::UndecodablePayload)
        );
        assert_eq!(
            decode("header.!!!.signature"),
            Err(TokenError::UndecodablePayload)
        );
    }

    #[test]
    fn refresh_horizon_is_inclusive_at_the_boundary() {
        let exp = 10_000;
        assert!(!needs_refresh(exp, exp - REFRESH_HORIZON_SECS - 1));
        assert!(needs_refresh(exp, exp - REFRESH_HORIZON_SECS));
        assert!(needs_refresh(exp, exp - 1));
        assert!(needs_refresh(exp, exp));
        assert!(needs_refresh(exp, exp + 1));
    }
}
