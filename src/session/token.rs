/*!
 * Access token inspection.
 *
 * The payload of the access token is decoded without verifying the
 * signature; it is only used to decide whether a session is worth
 * presenting as logged in. The server remains the authority.
 */

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;

/// Claims read from an access token payload
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// Subject (the account email)
    pub subject: Option<String>,
    /// Expiry as Unix epoch milliseconds
    pub expiry_epoch_ms: Option<i64>,
    /// Identity provider the token was issued for
    pub auth_provider: Option<String>,
}

/// Decode the payload segment of a JWT; `None` on any malformation
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let payload = payload.trim_end_matches('=');

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;
    let json: Value = serde_json::from_slice(&bytes).ok()?;
    let object = json.as_object()?;

    let expiry_epoch_ms = object
        .get("exp")
        .and_then(Value::as_f64)
        .filter(|exp| exp.is_finite())
        .map(|exp| (exp * 1000.0) as i64);

    Some(TokenClaims {
        subject: object.get("sub").and_then(Value::as_str).map(str::to_string),
        expiry_epoch_ms,
        auth_provider: object
            .get("auth_provider")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Expiry of the token in epoch milliseconds, if it carries one
pub fn expiry_epoch_ms(token: &str) -> Option<i64> {
    decode_claims(token).and_then(|claims| claims.expiry_epoch_ms)
}

/// Whether the token's expiry lies strictly after `now_ms`.
///
/// Missing `exp`, malformed payloads and empty tokens are all "not live".
pub fn is_token_live(token: &str, now_ms: i64) -> bool {
    expiry_epoch_ms(token).is_some_and(|exp| exp > now_ms)
}

/// Current time as Unix epoch milliseconds
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
