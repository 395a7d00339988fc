//! HTTP Basic Authentication
//!
//! Gate for the WebDAV mount. Credential comparison is constant-time;
//! authentication never reaches the bridge.

use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use subtle::ConstantTimeEq;

use super::config::Credentials;

/// Check the `Authorization: Basic …` header against the configured pair.
pub fn authorized(headers: &HeaderMap, creds: &Credentials) -> bool {
    let Some((user, pass)) = parse_basic(headers) else {
        return false;
    };
    // Bitwise-and keeps both comparisons unconditional.
    constant_time_eq(&user, &creds.username) & constant_time_eq(&pass, &creds.password)
}

/// 401 challenge for a missing or wrong credential.
pub fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, "Basic realm=\"blobdav\"")],
        "Unauthorized",
    )
        .into_response()
}

fn parse_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(BASE64.decode(encoded.trim()).ok()?).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
