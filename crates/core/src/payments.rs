//! Payment-gateway signature verification.
//!
//! Razorpay signs checkout callbacks with HMAC-SHA256 over
//! `"{order_id}|{payment_id}"` and webhook deliveries over the raw request
//! body, sending the MAC hex-encoded. Only verification lives here; order
//! creation and capture happen at the gateway.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Verify the signature Razorpay attaches to a successful checkout.
pub fn verify_checkout_signature(
    order_id: &str,
    payment_id: &str,
    signature_hex: &str,
    secret: &str,
) -> Result<(), CoreError> {
    let message = format!("{order_id}|{payment_id}");
    verify(message.as_bytes(), signature_hex, secret)
}

/// Verify the `X-Razorpay-Signature` header of a webhook delivery against
/// the raw request body.
pub fn verify_webhook_signature(
    body: &[u8],
    signature_hex: &str,
    secret: &str,
) -> Result<(), CoreError> {
    verify(body, signature_hex, secret)
}

fn verify(message: &[u8], signature_hex: &str, secret: &str) -> Result<(), CoreError> {
    let signature = decode_hex(signature_hex)
        .ok_or_else(|| CoreError::Unauthorized("Malformed payment signature".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| CoreError::Internal("Invalid payment secret".to_string()))?;
    mac.update(message);

    // verify_slice is constant-time.
    mac.verify_slice(&signature)
        .map_err(|_| CoreError::Unauthorized("Payment signature mismatch".to_string()))
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}
