//! Wire types for the escrow endpoints.

use banyan_keystore::EscrowedKeyMaterial;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/auth/create_escrowed_user_key`.
///
/// Carries the encryption public key; the api public key travels through
/// the device registration endpoint instead, keyed by its SPKI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEscrowedKeyRequest {
    pub public_key: String,
    pub encrypted_private_key_material: String,
    pub pass_key_salt: String,
}

impl From<&EscrowedKeyMaterial> for CreateEscrowedKeyRequest {
    fn from(escrowed: &EscrowedKeyMaterial) -> Self {
        Self {
            public_key: escrowed.encryption_public_key_pem.clone(),
            encrypted_private_key_material: escrowed.encrypted_private_key_material.clone(),
            pass_key_salt: escrowed.pass_key_salt.clone(),
        }
    }
}
