use thiserror::Error;

pub type KeystoreResult<T> = Result<T, KeystoreError>;

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("empty key data")]
    EmptyKeyData,

    #[error("invalid key data: {0}")]
    InvalidKeyData(String),

    #[error("PEM encode failed: {0}")]
    PemEncode(String),

    #[error("PEM decode failed: {0}")]
    PemDecode(String),

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("escrow error: {0}")]
    Escrow(String),

    /// Wrong passphrase, or a corrupted escrow bundle. Intentionally a
    /// single opaque variant: recovery failures must not leak which step
    /// rejected the input.
    #[error("wrong passphrase or corrupted escrow bundle")]
    WrongPassphrase,

    #[error("device key fingerprint already registered: {0}")]
    FingerprintConflict(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
