//! Local registry of device API keys, keyed by public-key fingerprint.
//!
//! Mirrors what the core service stores per account: one record per
//! device public key. Registering an already-known fingerprint is a
//! conflict and must not create a duplicate record.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{KeystoreError, KeystoreResult};

/// A registered device API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceApiKey {
    /// Hex SHA-1 fingerprint of the public key
    pub fingerprint: String,
    /// SPKI PEM of the public key
    pub public_key_pem: String,
    /// UUID v4 assigned at registration
    pub device_id: String,
    /// Unix timestamp of registration
    pub registered_at: u64,
}

/// All device API keys known for this account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceKeyRegistry {
    pub keys: Vec<DeviceApiKey>,
}

impl DeviceKeyRegistry {
    /// Load the registry from a JSON file; missing file is an empty registry.
    pub fn load(path: &Path) -> KeystoreResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the registry to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> KeystoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Look up a key by fingerprint.
    pub fn find(&self, fingerprint: &str) -> Option<&DeviceApiKey> {
        self.keys.iter().find(|k| k.fingerprint == fingerprint)
    }

    /// Register a new device key.
    ///
    /// Returns [`KeystoreError::FingerprintConflict`] if the fingerprint
    /// is already present; the registry is left unchanged in that case.
    pub fn register(
        &mut self,
        fingerprint: &str,
        public_key_pem: &str,
    ) -> KeystoreResult<DeviceApiKey> {
        if self.find(fingerprint).is_some() {
            return Err(KeystoreError::FingerprintConflict(fingerprint.to_string()));
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let key = DeviceApiKey {
            fingerprint: fingerprint.to_string(),
            public_key_pem: public_key_pem.to_string(),
            device_id: uuid::Uuid::new_v4().to_string(),
            registered_at: now,
        };
        self.keys.push(key.clone());
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_find() {
        let mut reg = DeviceKeyRegistry::default();
        let key = reg.register("aabbcc", "-----BEGIN PUBLIC KEY-----").unwrap();

        assert!(!key.device_id.is_empty());
        assert_eq!(reg.keys.len(), 1);
        assert!(reg.find("aabbcc").is_some());
        assert!(reg.find("ddeeff").is_none());
    }

    #[test]
    fn test_duplicate_fingerprint_conflicts() {
        let mut reg = DeviceKeyRegistry::default();
        reg.register("aabbcc", "pem-one").unwrap();

        let result = reg.register("aabbcc", "pem-two");
        assert!(matches!(
            result,
            Err(KeystoreError::FingerprintConflict(fp)) if fp == "aabbcc"
        ));
        assert_eq!(reg.keys.len(), 1, "conflict must not create a duplicate");
        assert_eq!(reg.find("aabbcc").unwrap().public_key_pem, "pem-one");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device_keys.json");

        let mut reg = DeviceKeyRegistry::default();
        reg.register("001122", "some-pem").unwrap();
        reg.save(&path).unwrap();

        let loaded = DeviceKeyRegistry::load(&path).unwrap();
        assert_eq!(loaded.keys.len(), 1);
        assert_eq!(loaded.keys[0].fingerprint, "001122");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reg = DeviceKeyRegistry::load(&dir.path().join("nope.json")).unwrap();
        assert!(reg.keys.is_empty());
    }
}
