//! banyan-keystore: client-side key material for Banyan escrowed accounts
//!
//! Lifecycle: generate → escrow (encrypt under a passphrase-derived key) →
//! upload; later: download → recover (decrypt) on a new device.
//!
//! Key layout:
//! ```text
//! KeyMaterial
//!   ├── api key pair        (P-384 ECDSA, signs API requests)
//!   └── encryption key pair (P-384 ECDH, wraps bucket keys)
//!
//! Escrow key (256-bit, PBKDF2-HMAC-SHA256 from passphrase + random salt)
//!   └── AES-256-GCM over the serialized private key PEMs
//! ```

pub mod escrow;
pub mod fingerprint;
pub mod material;
pub mod pem;
pub mod registry;

mod error;

pub use error::{KeystoreError, KeystoreResult};
pub use escrow::{escrow_key_material, recover_key_material, EscrowedKeyMaterial, KdfParams};
pub use fingerprint::{
    fingerprint_public_key, fingerprint_public_pem, hex_fingerprint, pretty_fingerprint,
};
pub use material::{KeyMaterial, PrivateKeyMaterial};
pub use pem::{b64_url_decode, b64_url_encode, is_pem};
pub use registry::{DeviceApiKey, DeviceKeyRegistry};

/// Size of the symmetric escrow key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the per-escrow PBKDF2 salt
pub const SALT_SIZE: usize = 16;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Size of a SHA-1 key fingerprint
pub const FINGERPRINT_SIZE: usize = 20;
