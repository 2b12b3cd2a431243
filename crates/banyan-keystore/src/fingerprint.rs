//! Public-key fingerprints: SHA-1 over a compressed SEC1 point.
//!
//! This module is P-384 specific. The compressed-point prefix is derived
//! from the least-significant bit of the final big-endian Y byte, which
//! equals the parity of Y only because P-384's field size is a whole
//! number of bytes. Widening curve support means revisiting this.

use p384::elliptic_curve::sec1::ToEncodedPoint;
use p384::pkcs8::DecodePublicKey;
use p384::PublicKey;
use sha1::{Digest, Sha1};

use crate::{KeystoreError, KeystoreResult, FINGERPRINT_SIZE};

/// Fingerprint a P-384 public key.
///
/// Exports the uncompressed SEC1 point, rebuilds the 49-byte compressed
/// form (`0x02 | parity` then the X coordinate), and SHA-1 hashes it.
pub fn fingerprint_public_key(key: &PublicKey) -> KeystoreResult<[u8; FINGERPRINT_SIZE]> {
    let point = key.to_encoded_point(false);
    let x = point
        .x()
        .ok_or_else(|| KeystoreError::InvalidKeyData("point has no x coordinate".into()))?;
    let y = point
        .y()
        .ok_or_else(|| KeystoreError::InvalidKeyData("point has no y coordinate".into()))?;

    let mut compressed = [0u8; 49];
    compressed[0] = 0x02 | (y[y.len() - 1] & 1);
    compressed[1..].copy_from_slice(x);

    Ok(Sha1::digest(compressed).into())
}

/// Fingerprint a public key given as SPKI PEM.
pub fn fingerprint_public_pem(pem: &str) -> KeystoreResult<[u8; FINGERPRINT_SIZE]> {
    let key = PublicKey::from_public_key_pem(pem)
        .map_err(|e| KeystoreError::PemDecode(format!("public key: {e}")))?;
    fingerprint_public_key(&key)
}

/// `"aabbcc…"` rendering of a fingerprint.
pub fn hex_fingerprint(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// `"aa:bb:cc…"` rendering of a fingerprint.
pub fn pretty_fingerprint(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}
