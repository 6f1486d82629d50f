use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ClientCredentials;
use crate::error::Result;

/// A GraphQL document plus its variables, as posted upstream
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

/// What the OAuth endpoint hands back for a client-credentials grant
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: Option<String>,
    /// Lifetime in seconds
    pub expires_in: Option<f64>,
}

// Upstream-side ports
#[async_trait]
pub trait TokenExchangePort: Send + Sync {
    async fn exchange(&self, credentials: &ClientCredentials) -> Result<TokenGrant>;
}

#[async_trait]
pub trait GraphQLPort: Send + Sync {
    /// Run a bearer-authenticated query and return its `data` member.
    async fn execute(&self, token: &str, request: &GraphQLRequest) -> Result<serde_json::Value>;
}

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}
