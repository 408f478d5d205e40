//! Bearer-token claims codec.
//!
//! The gateway issues JWTs whose claims carry the numeric user id. The
//! pipeline decodes the claims segment on every outgoing request to populate
//! the `X-User-Id` header. Decoding runs for unauthenticated requests too, so
//! it must never fail outward: anything malformed simply means "no identity".

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

/// Scheme prefix an already-prefixed stored credential may carry.
const BEARER_PREFIX: &str = "Bearer ";

/// Extract the numeric user id from a bearer credential.
///
/// Strips an optional `Bearer ` prefix, base64url-decodes the claims segment
/// and resolves identity in order: `userId`, then `id`, then `sub` if and
/// only if it is numeric. Returns `None` for absent, malformed, or
/// identity-less tokens; never panics and never returns an error.
#[must_use]
pub fn extract_user_id(credential: &str) -> Option<i64> {
    let clean = credential
        .strip_prefix(BEARER_PREFIX)
        .unwrap_or(credential)
        .trim();
    if clean.is_empty() {
        return None;
    }

    let mut segments = clean.split('.');
    let _header = segments.next()?;
    let claims_segment = segments.next()?;

    let decoded = URL_SAFE_NO_PAD
        .decode(claims_segment.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;

    claims
        .get("userId")
        .and_then(as_numeric)
        .or_else(|| claims.get("id").and_then(as_numeric))
        .or_else(|| claims.get("sub").and_then(as_numeric))
}

/// Read a claim as an integer, accepting both JSON numbers and numeric
/// strings (the gateway has emitted both over time).
fn as_numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Build an unsigned test token around the given claims JSON.
    fn token_with_claims(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_extracts_user_id_claim() {
        let token = token_with_claims(r#"{"userId":42,"sub":"someone@example.com"}"#);
        assert_eq!(extract_user_id(&token), Some(42));
    }

    #[test]
    fn test_falls_back_to_id_claim() {
        let token = token_with_claims(r#"{"id":7,"sub":"someone@example.com"}"#);
        assert_eq!(extract_user_id(&token), Some(7));
    }

    #[test]
    fn test_numeric_sub_claim() {
        let token = token_with_claims(r#"{"sub":"123"}"#);
        assert_eq!(extract_user_id(&token), Some(123));
    }

    #[test]
    fn test_non_numeric_sub_is_no_identity() {
        let token = token_with_claims(r#"{"sub":"a@b.com"}"#);
        assert_eq!(extract_user_id(&token), None);
    }

    #[test]
    fn test_user_id_wins_over_id_and_sub() {
        let token = token_with_claims(r#"{"userId":1,"id":2,"sub":"3"}"#);
        assert_eq!(extract_user_id(&token), Some(1));
    }

    #[test]
    fn test_string_user_id_claim() {
        let token = token_with_claims(r#"{"userId":"42"}"#);
        assert_eq!(extract_user_id(&token), Some(42));
    }

    #[test]
    fn test_bearer_prefix_stripped() {
        let token = token_with_claims(r#"{"userId":9}"#);
        assert_eq!(extract_user_id(&format!("Bearer {token}")), Some(9));
    }

    #[test]
    fn test_padded_claims_segment() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        // Padded base64url, as some encoders produce
        let payload = base64::engine::general_purpose::URL_SAFE.encode(br#"{"userId":5}"#);
        let token = format!("{header}.{payload}.sig");
        assert_eq!(extract_user_id(&token), Some(5));
    }

    #[test]
    fn test_malformed_tokens_yield_none() {
        assert_eq!(extract_user_id(""), None);
        assert_eq!(extract_user_id("   "), None);
        assert_eq!(extract_user_id("not-a-jwt"), None);
        assert_eq!(extract_user_id("only.onedot"), None);
        assert_eq!(extract_user_id("a.!!!not-base64!!!.c"), None);

        // Valid base64 but not JSON
        let garbage = URL_SAFE_NO_PAD.encode(b"garbage");
        assert_eq!(extract_user_id(&format!("a.{garbage}.c")), None);
    }

    #[test]
    fn test_claims_without_identity_yield_none() {
        let token = token_with_claims(r#"{"role":"ADMIN","exp":1700000000}"#);
        assert_eq!(extract_user_id(&token), None);
    }
}
