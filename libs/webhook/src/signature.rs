use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "Pachca-Signature";

/// Computes the lowercase hex HMAC-SHA256 of `body` keyed with `secret`.
///
/// ```
/// let sig = webhook::sign("secret", b"{}").unwrap();
/// assert_eq!(sig.len(), 64);
/// assert!(webhook::verify_signature("secret", b"{}", &sig).is_ok());
/// ```
pub fn sign(secret: &str, body: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `provided` against the signature of the exact raw `body`.
///
/// An empty header value counts as missing. Any other value, including one
/// that is not valid text, is compared byte for byte.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    provided: impl AsRef<[u8]>,
) -> Result<(), WebhookError> {
    let provided = provided.as_ref();
    if provided.is_empty() {
        return Err(WebhookError::NoSignature);
    }

    let expected = sign(secret, body).map_err(|_| WebhookError::InvalidSignature)?;
    if constant_time_eq(expected.as_bytes(), provided) {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
