//! HTTP client for the Banyan escrow API.

use banyan_core::config::ApiConfig;
use banyan_keystore::{DeviceApiKey, EscrowedKeyMaterial};
use reqwest::{header, Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::ClientError;
use crate::types::CreateEscrowedKeyRequest;

/// Result of a device key registration attempt.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// The service created and returned the stored record.
    Registered(DeviceApiKey),
    /// A key with the same fingerprint is already registered (HTTP 409).
    Conflict,
}

/// Client for the escrow and device registration endpoints.
///
/// Constructed once from config and handed to whatever orchestrates the
/// flow; holds a pooled `reqwest::Client` with the configured timeout.
pub struct EscrowClient {
    base_url: String,
    client: Client,
}

impl EscrowClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = config.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ClientError::Config(format!("invalid bearer token: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Upload an escrowed key bundle. Success is exactly HTTP 200.
    pub async fn escrow_device(
        &self,
        request: &CreateEscrowedKeyRequest,
    ) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/auth/create_escrowed_user_key", self.base_url);
        debug!(url = %url, "uploading escrowed key bundle");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    /// Fetch the escrowed bundle for the authenticated account.
    ///
    /// `Ok(None)` means the account was never escrowed (HTTP 404); network
    /// faults and server errors surface as `Err` instead of being
    /// swallowed, so the two cases stay distinguishable.
    pub async fn read_escrowed_device(
        &self,
    ) -> Result<Option<EscrowedKeyMaterial>, ClientError> {
        let url = format!("{}/api/v1/auth/device/escrow", self.base_url);
        debug!(url = %url, "fetching escrowed key bundle");

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let bundle = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("escrow bundle: {e}")))?;
        Ok(Some(bundle))
    }

    /// Register a device API public key by its base64url SPKI.
    ///
    /// 200 returns the stored record; 409 means the fingerprint is already
    /// registered and no duplicate was created.
    pub async fn register_device_key(
        &self,
        spki_b64url: &str,
    ) -> Result<RegisterOutcome, ClientError> {
        let url = format!(
            "{}/api/v1/auth/device/register?spki={spki_b64url}",
            self.base_url
        );
        debug!(url = %url, "registering device api key");

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let key = response
                    .json()
                    .await
                    .map_err(|e| ClientError::InvalidResponse(format!("device key: {e}")))?;
                Ok(RegisterOutcome::Registered(key))
            }
            StatusCode::CONFLICT => Ok(RegisterOutcome::Conflict),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn api_error(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ClientError::from_status(status, body)
    }
}
