// =============================================================================
// Webhook secret-token verification
// =============================================================================
//
// When a webhook secret is configured, Telegram echoes it back in the
// `X-Telegram-Bot-Api-Secret-Token` header of every delivery. Deliveries with
// a missing or wrong header are rejected with 403 before the body is
// processed. Comparison is performed in constant time.
// =============================================================================

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

// =============================================================================
// Constant-time comparison
// =============================================================================

/// Compare two byte slices in constant time. The loop always visits every
/// byte, so the position of the first mismatch is not observable.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

// =============================================================================
// Verification
// =============================================================================

/// Rejection returned when a webhook delivery fails verification.
#[derive(Debug)]
pub struct AuthRejection {
    status: StatusCode,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, axum::Json(body)).into_response()
    }
}

/// Check the secret header against `expected`. Always passes when no secret
/// is configured.
pub fn verify_webhook_secret(
    headers: &HeaderMap,
    expected: Option<&str>,
) -> Result<(), AuthRejection> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let presented = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());

    match presented {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => Ok(()),
        Some(_) => {
            warn!("webhook delivery with invalid secret token");
            Err(AuthRejection {
                status: StatusCode::FORBIDDEN,
                message: "Invalid webhook secret token",
            })
        }
        None => {
            warn!("webhook delivery without secret token");
            Err(AuthRejection {
                status: StatusCode::FORBIDDEN,
                message: "Missing webhook secret token",
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn constant_time_eq_identical() {
        assert!(constant_time_eq(b"hello", b"hello"));
    }

    #[test]
    fn constant_time_eq_different() {
        assert!(!constant_time_eq(b"hello", b"world"));
    }

    #[test]
    fn constant_time_eq_different_lengths() {
        assert!(!constant_time_eq(b"short", b"longer_string"));
    }

    #[test]
    fn constant_time_eq_single_bit_diff() {
        assert!(!constant_time_eq(b"\x00", b"\x01"));
    }

    fn headers_with(secret: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SECRET_HEADER, HeaderValue::from_static(secret));
        headers
    }

    #[test]
    fn no_configured_secret_accepts_everything() {
        assert!(verify_webhook_secret(&HeaderMap::new(), None).is_ok());
    }

    #[test]
    fn matching_secret_is_accepted() {
        assert!(verify_webhook_secret(&headers_with("s3cret"), Some("s3cret")).is_ok());
    }

    #[test]
    fn wrong_or_missing_secret_is_forbidden() {
        let err = verify_webhook_secret(&headers_with("guess"), Some("s3cret")).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let err = verify_webhook_secret(&HeaderMap::new(), Some("s3cret")).unwrap_err();
        assert_eq!(err.message, "Missing webhook secret token");
    }
}
