//! HTTP client for the add-user endpoint

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, header};

use super::models::{ProvisionRequest, assigned_user_id};
use super::outcome::ProvisionOutcome;

/// Issues add-user calls with a static bearer token
#[derive(Clone)]
pub struct ProvisioningClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl std::fmt::Debug for ProvisioningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ProvisioningClient {
    /// Create a client; `timeout` of `None` keeps the transport default
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one payload and classify the response
    ///
    /// Never returns an error: transport faults become [`ProvisionOutcome::Failed`]
    /// so the caller can carry on with the next row.
    pub async fn provision(&self, request: &ProvisionRequest) -> ProvisionOutcome {
        log::debug!(
            "POST {} requestId={} userId={}",
            self.endpoint,
            request.request_id,
            request.user_id
        );

        let response = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Request {} failed: {}", request.request_id, e);
                return ProvisionOutcome::Failed {
                    reason: format!("request failed: {}", e),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Reading response for {} failed: {}", request.request_id, e);
                return ProvisionOutcome::Failed {
                    reason: format!("failed to read response body: {}", e),
                };
            }
        };

        if status != StatusCode::OK {
            log::debug!("Request {} rejected with {}", request.request_id, status);
            return ProvisionOutcome::Rejected {
                status_code: status.as_u16(),
                body,
            };
        }

        let json: serde_json::Value = match serde_json::from_str(&body) {
            Ok(json) => json,
            Err(e) => {
                return ProvisionOutcome::Failed {
                    reason: format!("invalid JSON in 200 response: {}", e),
                };
            }
        };

        match assigned_user_id(&json) {
            Some(user_id) => ProvisionOutcome::Provisioned { user_id },
            None => {
                log::warn!("Request {} returned 200 without a user id", request.request_id);
                ProvisionOutcome::Failed {
                    reason: "200 response without a user id".to_string(),
                }
            }
        }
    }
}
