//! HTTP session against the device's configuration API.
//!
//! # Responsibilities
//! - Encode requests as `data=<json>&key=<api key>` form posts
//! - Unwrap the `{success, data, error}` response envelope
//! - Apply the configured TLS and timeout settings

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::RemoteConfig;
use crate::patch::Operation;
use crate::remote::{RemoteError, RemoteSession};
use crate::tree::{ConfigPath, ConfigValue};

/// Response envelope returned by every API endpoint.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Remote session speaking the device HTTP API through reqwest.
#[derive(Clone)]
pub struct HttpSession {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpSession {
    /// Build a session from the remote configuration.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_tls)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Post `payload` to `endpoint` and return the envelope's `data`.
    pub async fn request<P>(&self, endpoint: &str, payload: &P) -> Result<Value, RemoteError>
    where
        P: Serialize + ?Sized,
    {
        let data = serde_json::to_string(payload)
            .map_err(|e| RemoteError::UnexpectedResponse(format!("cannot encode request: {}", e)))?;

        tracing::debug!(endpoint = %endpoint, "Sending API request");

        let res = self
            .client
            .post(format!("{}/{}", self.endpoint, endpoint))
            .form(&[("data", data.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        let envelope: ApiResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) => {
                return Err(RemoteError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        };

        if !envelope.success {
            let message = envelope.error.unwrap_or_else(|| {
                format!("request to '{}' failed with status {}", endpoint, status)
            });
            return Err(RemoteError::Api(message));
        }

        Ok(envelope.data)
    }

    async fn configure(&self, ops: &[Operation]) -> Result<(), RemoteError> {
        self.request("configure", ops).await.map(|_| ())
    }
}

#[async_trait]
impl RemoteSession for HttpSession {
    async fn fetch_tree(&self) -> Result<ConfigValue, RemoteError> {
        let data = self
            .request("retrieve", &json!({"op": "showConfig", "path": []}))
            .await?;
        Ok(ConfigValue::from(data))
    }

    async fn set(&self, path: &ConfigPath, value: &ConfigValue) -> Result<(), RemoteError> {
        self.configure(&[Operation::Set {
            path: path.clone(),
            value: value.clone(),
        }])
        .await
    }

    async fn delete(&self, path: &ConfigPath) -> Result<(), RemoteError> {
        self.configure(&[Operation::Delete { path: path.clone() }]).await
    }

    async fn submit_batch(&self, ops: &[Operation]) -> Result<(), RemoteError> {
        self.configure(ops).await
    }

    async fn save(&self) -> Result<(), RemoteError> {
        self.request("config-file", &json!({"op": "save"})).await.map(|_| ())
    }

    async fn save_to_file(&self, file: &str) -> Result<(), RemoteError> {
        self.request("config-file", &json!({"op": "save", "file": file}))
            .await
            .map(|_| ())
    }
}

impl std::fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
