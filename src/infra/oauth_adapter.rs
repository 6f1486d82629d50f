use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error};

use crate::app::ports::{TokenExchangePort, TokenGrant};
use crate::config::ClientCredentials;
use crate::error::{GatewayError, Result};

/// Client-credentials exchange against the upstream OAuth endpoint
pub struct ReqwestTokenExchange {
    client: reqwest::Client,
    token_url: String,
}

impl ReqwestTokenExchange {
    pub fn new(client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }
}

#[async_trait]
impl TokenExchangePort for ReqwestTokenExchange {
    async fn exchange(&self, credentials: &ClientCredentials) -> Result<TokenGrant> {
        debug!(url = %self.token_url, "Requesting client-credentials token");

        let body = json!({
            "grant_type": "client_credentials",
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
        });

        let response = self
            .client
            .post(&self.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamAuth(format!("Request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GatewayError::UpstreamAuth(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                body = %response_text,
                "Token endpoint rejected credentials"
            );
            return Err(GatewayError::UpstreamAuth(format!(
                "Token endpoint returned {}: {}",
                status, response_text
            )));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            GatewayError::UpstreamAuth(format!("Failed to parse token response: {}", e))
        })
    }
}
