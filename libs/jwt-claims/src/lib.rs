//! Unverified JWT claim decoding for the Campus client.
//!
//! The client never checks token signatures (that is the server's job); it
//! only needs to read the payload to know who a credential belongs to and
//! when it stops being usable. Everything here fails closed: a token whose
//! payload cannot be decoded is reported as expired and carries no claims.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Claim set carried by Campus access tokens.
///
/// Every field is optional: the decoder accepts any syntactically valid
/// payload and lets callers decide which claims they require.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user or admin ID)
    #[serde(default)]
    pub sub: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Role name ("user" or "admin")
    #[serde(default)]
    pub role: Option<String>,
    /// Issued at (Unix timestamp, seconds)
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiration time (Unix timestamp, seconds)
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a compact JWT without verifying it.
///
/// Splits on `.`, takes the second segment, reverses the URL-safe base64
/// encoding (padded and unpadded forms both accepted) and parses the JSON
/// claims object. Returns `None` on any malformed input; never panics.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expiry instant of a token in Unix milliseconds, or `None` when the
/// token is undecodable or carries no `exp` claim.
pub fn expires_at_ms(token: &str) -> Option<i64> {
    decode_claims(token)?.exp.map(|exp| exp * 1000)
}

/// Whether a token is expired at the given instant (Unix milliseconds).
///
/// Unknown expiry counts as expired, and the boundary is inclusive: a
/// token whose expiry equals `now_ms` is already unusable.
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    match expires_at_ms(token) {
        Some(exp_ms) => now_ms >= exp_ms,
        None => true,
    }
}

/// Whether a token is expired against the wall clock.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now().timestamp_millis())
}
