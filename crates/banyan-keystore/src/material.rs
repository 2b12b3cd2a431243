//! Key-material generation: the two P-384 key pairs behind a Banyan account.
//!
//! The api pair signs requests to the core service (ECDSA); the encryption
//! pair wraps bucket keys (ECDH). Private halves only ever leave this
//! module as PKCS#8 PEM, and only on their way into the escrow codec.

use p384::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use p384::{PublicKey, SecretKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::fingerprint::fingerprint_public_key;
use crate::{KeystoreError, KeystoreResult, FINGERPRINT_SIZE};

/// A freshly generated or recovered pair of P-384 key pairs.
#[derive(Clone)]
pub struct KeyMaterial {
    api: SecretKey,
    encryption: SecretKey,
}

impl KeyMaterial {
    /// Generate both key pairs from the system CSPRNG.
    ///
    /// Curve support is fixed at compile time (P-384), so generation
    /// itself cannot fail; only the PEM exports are fallible.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            api: SecretKey::random(&mut rng),
            encryption: SecretKey::random(&mut rng),
        }
    }

    /// Rebuild key pairs from recovered private PEMs.
    pub fn from_private_material(material: &PrivateKeyMaterial) -> KeystoreResult<Self> {
        let api = SecretKey::from_pkcs8_pem(&material.api_private_key_pem)
            .map_err(|e| KeystoreError::PemDecode(format!("api private key: {e}")))?;
        let encryption = SecretKey::from_pkcs8_pem(&material.encryption_private_key_pem)
            .map_err(|e| KeystoreError::PemDecode(format!("encryption private key: {e}")))?;
        Ok(Self { api, encryption })
    }

    pub fn api_public_key(&self) -> PublicKey {
        self.api.public_key()
    }

    pub fn encryption_public_key(&self) -> PublicKey {
        self.encryption.public_key()
    }

    /// SPKI PEM of the api public key.
    pub fn api_public_key_pem(&self) -> KeystoreResult<String> {
        public_key_pem(&self.api.public_key())
    }

    /// SPKI PEM of the encryption public key.
    pub fn encryption_public_key_pem(&self) -> KeystoreResult<String> {
        public_key_pem(&self.encryption.public_key())
    }

    /// Standard-base64 SPKI DER of the api public key, as the device
    /// registration endpoint expects before base64url re-encoding.
    pub fn api_public_key_spki_b64(&self) -> KeystoreResult<String> {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;

        let der = self
            .api
            .public_key()
            .to_public_key_der()
            .map_err(|e| KeystoreError::PemEncode(format!("api SPKI: {e}")))?;
        Ok(STANDARD.encode(der.as_bytes()))
    }

    /// SHA-1 fingerprint of the api public key.
    pub fn fingerprint(&self) -> KeystoreResult<[u8; FINGERPRINT_SIZE]> {
        fingerprint_public_key(&self.api.public_key())
    }

    /// Export both private keys as PKCS#8 PEM.
    pub fn private_material(&self) -> KeystoreResult<PrivateKeyMaterial> {
        let api = self
            .api
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| KeystoreError::PemEncode(format!("api private key: {e}")))?;
        let encryption = self
            .encryption
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| KeystoreError::PemEncode(format!("encryption private key: {e}")))?;
        Ok(PrivateKeyMaterial {
            api_private_key_pem: api.to_string(),
            encryption_private_key_pem: encryption.to_string(),
        })
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("api", &"[REDACTED]")
            .field("encryption", &"[REDACTED]")
            .finish()
    }
}

fn public_key_pem(key: &PublicKey) -> KeystoreResult<String> {
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| KeystoreError::PemEncode(format!("public key: {e}")))
}

/// The two private-key PEMs. Exists only transiently before encryption or
/// after decryption; zeroized on drop.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyMaterial {
    pub api_private_key_pem: String,
    pub encryption_private_key_pem: String,
}

impl std::fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyMaterial")
            .field("api_private_key_pem", &"[REDACTED]")
            .field("encryption_private_key_pem", &"[REDACTED]")
            .finish()
    }
}
