//! Passphrase-based escrow codec: PBKDF2 key derivation + AES-256-GCM.
//!
//! Escrow encrypts the serialized private PEMs under a key derived from
//! the account passphrase and a fresh random salt; recovery inverts it.
//! The salt is generated once per escrow operation and never reused.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroize;

use crate::material::{KeyMaterial, PrivateKeyMaterial};
use crate::{KeystoreError, KeystoreResult, KEY_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// PBKDF2-HMAC-SHA256 parameters for the escrow key.
#[derive(Debug, Clone)]
pub struct KdfParams {
    /// Iteration count (default: 600000)
    pub rounds: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { rounds: 600_000 }
    }
}

/// The escrowed record persisted by the core service: public halves in the
/// clear, private halves as an AES-GCM blob, plus the KDF salt. Immutable
/// once produced; replaced wholesale on re-escrow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EscrowedKeyMaterial {
    pub api_public_key_pem: String,
    pub encryption_public_key_pem: String,
    /// base64 of `[12-byte nonce][ciphertext + 16-byte tag]`
    pub encrypted_private_key_material: String,
    /// base64 of the 16-byte PBKDF2 salt
    pub pass_key_salt: String,
}

/// Derive the 256-bit escrow key from a passphrase and salt.
fn derive_escrow_key(
    passphrase: &SecretString,
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> KeystoreResult<[u8; KEY_SIZE]> {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::<Hmac<Sha256>>(
        passphrase.expose_secret().as_bytes(),
        salt,
        params.rounds,
        &mut key,
    )
    .map_err(|e| KeystoreError::Escrow(format!("PBKDF2 derivation failed: {e}")))?;
    Ok(key)
}

/// Escrow key material under a passphrase.
///
/// Generates a fresh random salt and nonce, derives the escrow key,
/// serializes the private PEMs to JSON, and seals them with AES-256-GCM.
pub fn escrow_key_material(
    material: &KeyMaterial,
    passphrase: &SecretString,
    params: &KdfParams,
) -> KeystoreResult<EscrowedKeyMaterial> {
    let private = material.private_material()?;
    let mut plaintext = serde_json::to_vec(&private)?;

    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut key = derive_escrow_key(passphrase, &salt, params)?;
    let cipher = Aes256Gcm::new((&key).into());
    key.zeroize();

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let result = cipher.encrypt(nonce, plaintext.as_slice());
    plaintext.zeroize();
    let ciphertext =
        result.map_err(|e| KeystoreError::Escrow(format!("escrow encryption failed: {e}")))?;

    debug!(rounds = params.rounds, "key material escrowed");

    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(EscrowedKeyMaterial {
        api_public_key_pem: material.api_public_key_pem()?,
        encryption_public_key_pem: material.encryption_public_key_pem()?,
        encrypted_private_key_material: STANDARD.encode(&blob),
        pass_key_salt: STANDARD.encode(salt),
    })
}

/// Recover private key material from an escrowed record.
///
/// Every failure on this path — bad base64, AEAD rejection, JSON that does
/// not parse — collapses to [`KeystoreError::WrongPassphrase`]. Callers
/// prompt for re-entry; throttling repeated attempts is their concern.
pub fn recover_key_material(
    escrowed: &EscrowedKeyMaterial,
    passphrase: &SecretString,
    params: &KdfParams,
) -> KeystoreResult<PrivateKeyMaterial> {
    let blob = STANDARD
        .decode(&escrowed.encrypted_private_key_material)
        .map_err(|_| KeystoreError::WrongPassphrase)?;
    let salt: [u8; SALT_SIZE] = STANDARD
        .decode(&escrowed.pass_key_salt)
        .map_err(|_| KeystoreError::WrongPassphrase)?
        .try_into()
        .map_err(|_| KeystoreError::WrongPassphrase)?;

    if blob.len() < NONCE_SIZE + TAG_SIZE {
        return Err(KeystoreError::WrongPassphrase);
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);

    let mut key = derive_escrow_key(passphrase, &salt, params)?;
    let cipher = Aes256Gcm::new((&key).into());
    key.zeroize();

    let mut plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| KeystoreError::WrongPassphrase)?;

    let parsed = serde_json::from_slice::<PrivateKeyMaterial>(&plaintext);
    plaintext.zeroize();
    parsed.map_err(|_| KeystoreError::WrongPassphrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fast params for tests; production default is 600k rounds.
    fn test_params() -> KdfParams {
        KdfParams { rounds: 1_000 }
    }

    fn passphrase(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_escrow_recover_roundtrip() {
        let material = KeyMaterial::generate();
        let original = material.private_material().unwrap();

        let escrowed =
            escrow_key_material(&material, &passphrase("hunter2hunter2"), &test_params()).unwrap();
        let recovered =
            recover_key_material(&escrowed, &passphrase("hunter2hunter2"), &test_params()).unwrap();

        assert_eq!(original.api_private_key_pem, recovered.api_private_key_pem);
        assert_eq!(
            original.encryption_private_key_pem,
            recovered.encryption_private_key_pem
        );
    }

    #[test]
    fn test_recover_wrong_passphrase_fails() {
        let material = KeyMaterial::generate();
        let escrowed =
            escrow_key_material(&material, &passphrase("right one"), &test_params()).unwrap();

        let result = recover_key_material(&escrowed, &passphrase("wrong one"), &test_params());
        assert!(matches!(result, Err(KeystoreError::WrongPassphrase)));
    }

    #[test]
    fn test_recover_corrupted_blob_fails_opaquely() {
        let material = KeyMaterial::generate();
        let mut escrowed =
            escrow_key_material(&material, &passphrase("pw"), &test_params()).unwrap();

        escrowed.encrypted_private_key_material = "!!not base64!!".into();
        assert!(matches!(
            recover_key_material(&escrowed, &passphrase("pw"), &test_params()),
            Err(KeystoreError::WrongPassphrase)
        ));

        escrowed.encrypted_private_key_material = STANDARD.encode([0u8; 8]);
        assert!(matches!(
            recover_key_material(&escrowed, &passphrase("pw"), &test_params()),
            Err(KeystoreError::WrongPassphrase)
        ));
    }

    #[test]
    fn test_salt_unique_per_escrow() {
        let material = KeyMaterial::generate();
        let a = escrow_key_material(&material, &passphrase("pw"), &test_params()).unwrap();
        let b = escrow_key_material(&material, &passphrase("pw"), &test_params()).unwrap();

        assert_ne!(a.pass_key_salt, b.pass_key_salt, "salts must be fresh");
        assert_ne!(
            a.encrypted_private_key_material, b.encrypted_private_key_material,
            "nonces must be fresh"
        );
    }

    #[test]
    fn test_escrowed_record_has_no_private_material() {
        let material = KeyMaterial::generate();
        let private = material.private_material().unwrap();
        let escrowed = escrow_key_material(&material, &passphrase("pw"), &test_params()).unwrap();

        let json = serde_json::to_string(&escrowed).unwrap();
        let body = crate::pem::private_pem_unwrap(&private.api_private_key_pem);
        assert!(!json.contains(&body), "private key must never appear in the clear");
    }

    #[test]
    fn test_kdf_deterministic() {
        let salt = [7u8; SALT_SIZE];
        let k1 = derive_escrow_key(&passphrase("abc"), &salt, &test_params()).unwrap();
        let k2 = derive_escrow_key(&passphrase("abc"), &salt, &test_params()).unwrap();
        assert_eq!(k1, k2);

        let k3 = derive_escrow_key(&passphrase("abd"), &salt, &test_params()).unwrap();
        assert_ne!(k1, k3);
    }
}
