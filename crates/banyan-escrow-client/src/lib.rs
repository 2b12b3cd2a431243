//! banyan-escrow-client: transport for the escrowed-key lifecycle.
//!
//! Three operations against the Banyan core service:
//! - upload an escrowed key bundle at account setup,
//! - fetch it back when logging in from a new device,
//! - register a device API public key (conflict-checked by fingerprint).
//!
//! Clients are constructed explicitly from config and passed to callers;
//! there are no module-level singletons.

pub mod client;
pub mod error;
pub mod types;

pub use client::{EscrowClient, RegisterOutcome};
pub use error::{kind_for_status, ApiErrorKind, ClientError};
pub use types::CreateEscrowedKeyRequest;
