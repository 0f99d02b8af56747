//! Shopify webhook HMAC verification.
//!
//! Shopify signs every webhook delivery with HMAC-SHA256 over the raw request
//! body, keyed with the app's shared secret, and sends the base64 digest in
//! the `X-Shopify-Hmac-Sha256` header.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::config::ApiSecret;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 webhook signature.
pub const HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";

fn keyed_mac(secret: &ApiSecret, body: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac
}

/// Compute the base64 HMAC-SHA256 of `body` under `secret`.
pub fn compute_webhook_hmac(secret: &ApiSecret, body: &[u8]) -> String {
    STANDARD.encode(keyed_mac(secret, body).finalize().into_bytes())
}

/// Verify a Shopify webhook signature.
///
/// # Arguments
///
/// * `secret` - The app's shared secret
/// * `body` - The request body exactly as received on the wire
/// * `signature` - The `X-Shopify-Hmac-Sha256` header value, if any
///
/// # Returns
///
/// `true` only when the header decodes to the exact MAC of `body`.
/// Missing, empty, or undecodable headers are rejected.
pub fn verify_webhook_hmac(secret: &ApiSecret, body: &[u8], signature: Option<&str>) -> bool {
    let signature = match signature.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            warn!("webhook_hmac_missing");
            return false;
        }
    };

    let claimed = match STANDARD.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(signature_length = signature.len(), "webhook_hmac_not_base64");
            return false;
        }
    };

    // Constant-time comparison to prevent timing attacks
    let valid = keyed_mac(secret, body).verify_slice(&claimed).is_ok();

    if !valid {
        warn!(
            body_length = body.len(),
            claimed_length = claimed.len(),
            "webhook_hmac_invalid"
        );
    }

    valid
}
