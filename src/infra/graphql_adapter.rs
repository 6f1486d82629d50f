use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::error;

use crate::app::ports::{GraphQLPort, GraphQLRequest};
use crate::error::{GatewayError, Result};

#[derive(Deserialize)]
struct GqlResponse {
    data: Option<serde_json::Value>,
    errors: Option<serde_json::Value>,
}

pub struct ReqwestGraphQL {
    client: reqwest::Client,
    graphql_url: String,
}

impl ReqwestGraphQL {
    pub fn new(client: reqwest::Client, graphql_url: impl Into<String>) -> Self {
        Self {
            client,
            graphql_url: graphql_url.into(),
        }
    }
}

/// Split a raw GraphQL response body into its `data`, failing on any
/// reported errors even when partial data came back.
pub fn extract_data(response_text: &str) -> Result<serde_json::Value> {
    let parsed: GqlResponse = serde_json::from_str(response_text).map_err(|e| {
        GatewayError::UpstreamQuery(format!(
            "Failed to parse GraphQL response: {} - Response: {}",
            e, response_text
        ))
    })?;

    if let Some(errs) = &parsed.errors {
        let has_errors = errs.as_array().map_or(!errs.is_null(), |a| !a.is_empty());
        if has_errors {
            return Err(GatewayError::UpstreamQuery(format!("GraphQL errors: {}", errs)));
        }
    }

    parsed
        .data
        .filter(|d| !d.is_null())
        .ok_or_else(|| GatewayError::UpstreamQuery("No data in response".to_string()))
}

#[async_trait]
impl GraphQLPort for ReqwestGraphQL {
    async fn execute(&self, token: &str, request: &GraphQLRequest) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.graphql_url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamQuery(format!("Request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| {
                GatewayError::UpstreamQuery(format!("Failed to get response text: {}", e))
            })?;

        if !status.is_success() {
            error!(status = status.as_u16(), "GraphQL endpoint returned an error status");
            return Err(GatewayError::UpstreamQuery(format!(
                "GraphQL endpoint returned {}: {}",
                status, response_text
            )));
        }

        extract_data(&response_text)
    }
}
