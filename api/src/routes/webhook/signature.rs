//! `X-Hub-Signature-256` verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing {SIGNATURE_HEADER} header")]
    Missing,
    #[error("signature must start with sha256=")]
    BadPrefix,
    #[error("signature is not valid hex")]
    BadHex,
    #[error("signature does not match payload")]
    Mismatch,
}

/// Checks `sha256=<hex>` against HMAC-SHA256 of `body` keyed by `secret`.
///
/// The comparison is constant-time.
pub fn verify_signature(
    secret: &str,
    header: Option<&str>,
    body: &[u8],
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let hex_sig = header
        .trim()
        .strip_prefix("sha256=")
        .ok_or(SignatureError::BadPrefix)?;
    let expected = hex::decode(hex_sig).map_err(|_| SignatureError::BadHex)?;

    // HMAC accepts keys of any length.
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return Err(SignatureError::Mismatch);
    };
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}
