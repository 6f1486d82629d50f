use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::app::ports::{Clock, TokenExchangePort};
use crate::config::ClientCredentials;
use crate::error::{GatewayError, Result};
use crate::observability::metrics;

/// Bearer token and the instant (epoch ms) it stops being usable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at_ms: i64,
}

impl AccessToken {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.expires_at_ms > now_ms
    }
}

/// Process-wide token holder. A refresh replaces the whole token; concurrent
/// callers racing an expiry may each exchange credentials, and the last
/// writer wins.
pub struct TokenManager {
    credentials: Option<ClientCredentials>,
    exchange: Arc<dyn TokenExchangePort>,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(
        credentials: Option<ClientCredentials>,
        exchange: Arc<dyn TokenExchangePort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            exchange,
            clock,
            current: RwLock::new(None),
        }
    }

    /// Return the cached token while it is still in the future, otherwise
    /// exchange credentials for a new one.
    pub async fn get_access_token(&self) -> Result<String> {
        let now = self.clock.now_ms();
        if let Some(token) = self.current.read().await.as_ref() {
            if token.is_valid_at(now) {
                debug!("Reusing cached access token");
                return Ok(token.value.clone());
            }
        }

        info!("Fetching new access token");
        match self.refresh().await {
            Ok(token) => {
                metrics::token::refreshed();
                info!(expires_at_ms = token.expires_at_ms, "New access token obtained");
                let value = token.value.clone();
                *self.current.write().await = Some(token);
                Ok(value)
            }
            Err(e) => {
                metrics::token::failed();
                error!("Error fetching access token: {}", e);
                Err(e)
            }
        }
    }

    /// Snapshot of the cached token, if any
    pub async fn current(&self) -> Option<AccessToken> {
        self.current.read().await.clone()
    }

    async fn refresh(&self) -> Result<AccessToken> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            GatewayError::UpstreamAuth("client credentials are not configured".to_string())
        })?;

        let grant = self.exchange.exchange(credentials).await.map_err(|e| match e {
            GatewayError::UpstreamAuth(msg) => GatewayError::UpstreamAuth(msg),
            other => GatewayError::UpstreamAuth(other.to_string()),
        })?;

        let value = grant
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                GatewayError::UpstreamAuth("token response carried no access_token".to_string())
            })?;

        // Missing lifetime yields a token that expires immediately
        let lifetime_ms = grant
            .expires_in
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(|secs| (secs * 1000.0) as i64)
            .unwrap_or(0);

        Ok(AccessToken {
            value,
            expires_at_ms: self.clock.now_ms().saturating_add(lifetime_ms),
        })
    }
}
