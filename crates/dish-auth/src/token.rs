//! Unverified access-token inspection.
//!
//! The BaaS validates tokens itself; these helpers only let the client skip a
//! round trip for a token that is obviously expired.

use base64::Engine as _;
use chrono::{DateTime, TimeDelta, Utc};

use crate::error::AuthError;

/// Tokens expiring within this many seconds are treated as expired.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Decode the JWT `exp` claim without verifying the signature.
///
/// # Errors
///
/// Returns `AuthError::Other` if the token is not a three-part JWT or the `exp`
/// claim is missing or invalid.
pub fn decode_expiry(jwt: &str) -> Result<DateTime<Utc>, AuthError> {
    let claims = decode_claims(jwt)?;
    let exp = claims["exp"]
        .as_i64()
        .ok_or_else(|| AuthError::Other("missing exp claim".into()))?;
    DateTime::from_timestamp(exp, 0).ok_or_else(|| AuthError::Other("invalid exp timestamp".into()))
}

/// Decode the JWT `sub` claim (the user id) without verifying the signature.
///
/// Works on expired tokens, so callers can still tell whose token it was.
///
/// # Errors
///
/// Returns `AuthError::Other` if the token is not a three-part JWT or `sub` is
/// missing or empty.
pub fn decode_subject(jwt: &str) -> Result<String, AuthError> {
    let claims = decode_claims(jwt)?;
    claims["sub"]
        .as_str()
        .filter(|sub| !sub.is_empty())
        .map(String::from)
        .ok_or_else(|| AuthError::Other("missing sub claim".into()))
}

fn decode_claims(jwt: &str) -> Result<serde_json::Value, AuthError> {
    let mut parts = jwt.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::Other("invalid JWT format".into()));
    };

    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::Other(format!("base64 decode failed: {e}")))?;
    serde_json::from_slice(&payload).map_err(|e| AuthError::Other(format!("JSON parse failed: {e}")))
}

/// `true` if the token's `exp` falls before `now + buffer_secs`.
///
/// Tokens that are not decodable JWTs are never considered expired here; the
/// server gets to reject them.
#[must_use]
pub fn is_near_expiry(jwt: &str, buffer_secs: i64, now: DateTime<Utc>) -> bool {
    decode_expiry(jwt).is_ok_and(|exp| exp <= now + TimeDelta::seconds(buffer_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_jwt_with_exp(exp: i64) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(r#"{"alg":"HS256"}"#);
        let payload = engine.encode(format!(r#"{{"sub":"user-1","exp":{exp}}}"#));
        let signature = engine.encode("sig");
        format!("{header}.{payload}.{signature}")
    }

    #[test]
    fn decodes_exp_claim() {
        let exp = Utc::now().timestamp() + 3600;
        let decoded = decode_expiry(&make_jwt_with_exp(exp)).expect("decode");
        assert_eq!(decoded.timestamp(), exp);
    }

    #[test]
    fn rejects_wrong_segment_count() {
        let err = decode_expiry("a.b").unwrap_err();
        assert!(err.to_string().contains("invalid JWT format"));
        assert!(decode_expiry("a.b.c.d").is_err());
    }

    #[test]
    fn rejects_missing_exp() {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let jwt = format!(
            "{}.{}.{}",
            engine.encode("{}"),
            engine.encode(r#"{"sub":"user-1"}"#),
            engine.encode("sig")
        );
        let err = decode_expiry(&jwt).unwrap_err();
        assert!(err.to_string().contains("missing exp claim"));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = decode_expiry("header.!!!.sig").unwrap_err();
        assert!(err.to_string().contains("base64 decode failed"));
    }

    #[test]
    fn near_expiry_honours_buffer() {
        let now = Utc::now();
        let soon = make_jwt_with_exp(now.timestamp() + 30);
        let later = make_jwt_with_exp(now.timestamp() + 600);
        let past = make_jwt_with_exp(now.timestamp() - 10);

        assert!(is_near_expiry(&soon, EXPIRY_BUFFER_SECS, now));
        assert!(!is_near_expiry(&later, EXPIRY_BUFFER_SECS, now));
        assert!(is_near_expiry(&past, EXPIRY_BUFFER_SECS, now));
    }

    #[test]
    fn subject_is_readable_from_expired_token() {
        let expired = make_jwt_with_exp(Utc::now().timestamp() - 3600);
        assert_eq!(decode_subject(&expired).expect("sub"), "user-1");
        assert!(decode_subject("opaque-token").is_err());
    }

    #[test]
    fn empty_subject_is_rejected() {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let jwt = format!(
            "{}.{}.{}",
            engine.encode("{}"),
            engine.encode(r#"{"sub":"","exp":1}"#),
            engine.encode("sig")
        );
        let err = decode_subject(&jwt).unwrap_err();
        assert!(err.to_string().contains("missing sub claim"));
    }

    #[test]
    fn opaque_tokens_are_not_expired() {
        assert!(!is_near_expiry("opaque-token", EXPIRY_BUFFER_SECS, Utc::now()));
    }
}
