//! The event gateway: token management, the two response caches, and the
//! list/detail/probe operations that sit in front of the upstream GraphQL API.

pub mod cache;
pub mod normalize;
pub mod queries;
pub mod schema;
pub mod token;

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::app::ports::{Clock, GraphQLPort, GraphQLRequest, TokenExchangePort};
use crate::config::{ClientCredentials, Config};
use crate::constants::MAX_TIMESLOT_LIMIT;
use crate::error::{GatewayError, Result};
use crate::infra::{build_http_client, ReqwestGraphQL, ReqwestTokenExchange, SystemClock};
use crate::observability::metrics;
use crate::types::{sort_chronologically, EventDetail, EventListResponse};

use cache::TtlCache;
use schema::{EventDetailData, HostEventsData};
use token::TokenManager;

pub const LIST_CACHE: &str = "list";
pub const DETAIL_CACHE: &str = "detail";

/// Upstream collaborators the gateway is wired to
#[derive(Clone)]
pub struct GatewayPorts {
    pub token_exchange: Arc<dyn TokenExchangePort>,
    pub graphql: Arc<dyn GraphQLPort>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub list_ttl_ms: i64,
    pub detail_ttl_ms: i64,
    pub default_host_id: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Config::default().into()
    }
}

impl From<Config> for GatewaySettings {
    fn from(config: Config) -> Self {
        Self {
            list_ttl_ms: config.cache.list_ttl_ms,
            detail_ttl_ms: config.cache.detail_ttl_ms,
            default_host_id: config.server.default_host_id,
        }
    }
}

/// Shared gateway state: one token slot and two independent caches. Cloned
/// behind an `Arc` into every request handler.
pub struct EventGateway {
    tokens: TokenManager,
    graphql: Arc<dyn GraphQLPort>,
    clock: Arc<dyn Clock>,
    list_cache: TtlCache<EventListResponse>,
    detail_cache: TtlCache<EventDetail>,
    default_host_id: String,
}

impl EventGateway {
    pub fn new(
        ports: GatewayPorts,
        credentials: Option<ClientCredentials>,
        settings: GatewaySettings,
    ) -> Self {
        Self {
            tokens: TokenManager::new(credentials, ports.token_exchange, ports.clock.clone()),
            graphql: ports.graphql,
            clock: ports.clock,
            list_cache: TtlCache::new(LIST_CACHE, settings.list_ttl_ms),
            detail_cache: TtlCache::new(DETAIL_CACHE, settings.detail_ttl_ms),
            default_host_id: settings.default_host_id,
        }
    }

    /// Wire the gateway to the real upstream over reqwest.
    pub fn from_config(config: &Config, credentials: Option<ClientCredentials>) -> Result<Self> {
        let client = build_http_client(&config.upstream)?;
        let ports = GatewayPorts {
            token_exchange: Arc::new(ReqwestTokenExchange::new(
                client.clone(),
                config.upstream.token_url.clone(),
            )),
            graphql: Arc::new(ReqwestGraphQL::new(client, config.upstream.graphql_url.clone())),
            clock: Arc::new(SystemClock),
        };
        Ok(Self::new(ports, credentials, config.clone().into()))
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn list_cache(&self) -> &TtlCache<EventListResponse> {
        &self.list_cache
    }

    pub fn detail_cache(&self) -> &TtlCache<EventDetail> {
        &self.detail_cache
    }

    /// Host to list when the caller gave none (or an empty one)
    pub fn resolve_host_id(&self, requested: Option<&str>) -> String {
        requested
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_host_id.clone())
    }

    /// Posted events for a host, sorted by earliest timeslot start.
    ///
    /// `timeslot_limit` of `None` or `0` means the maximum; larger values are
    /// clamped to it. A host with no events yields an empty list.
    #[instrument(skip(self))]
    pub async fn get_event_list(
        &self,
        host_id: &str,
        timeslot_limit: Option<u32>,
    ) -> Result<Arc<EventListResponse>> {
        let timeslot_limit = match timeslot_limit {
            Some(n) if n > 0 => n.min(MAX_TIMESLOT_LIMIT),
            _ => MAX_TIMESLOT_LIMIT,
        };
        let cache_key = format!("{}:{}", host_id, timeslot_limit);

        if let Some(cached) = self.list_cache.get(&cache_key, self.clock.now_ms()).await {
            info!("Returning cached events list");
            return Ok(cached);
        }

        info!("Fetching lightweight events list from upstream");
        let data = self
            .run_query(LIST_CACHE, &queries::event_list(host_id, timeslot_limit))
            .await?;
        let parsed: HostEventsData = decode(data)?;

        let (total_count, nodes) = match parsed.host.and_then(|h| h.events) {
            Some(conn) => (conn.total_count.unwrap_or(0), conn.into_nodes()),
            None => (0, Vec::new()),
        };

        let mut events: Vec<_> = nodes.into_iter().map(normalize::summarize).collect();
        sort_chronologically(&mut events);

        let response = Arc::new(EventListResponse {
            events,
            total_count,
        });
        self.list_cache
            .insert(cache_key, Arc::clone(&response), self.clock.now_ms())
            .await;

        info!(count = response.events.len(), "Events list cached");
        Ok(response)
    }

    /// One event with its full field set. A null upstream event is
    /// `NotFound` and is never cached.
    #[instrument(skip(self))]
    pub async fn get_event_detail(&self, event_id: &str) -> Result<Arc<EventDetail>> {
        if let Some(cached) = self.detail_cache.get(event_id, self.clock.now_ms()).await {
            info!("Returning cached event detail");
            return Ok(cached);
        }

        info!("Fetching event detail from upstream");
        let data = self
            .run_query(DETAIL_CACHE, &queries::event_detail(event_id))
            .await?;
        let parsed: EventDetailData = decode(data)?;

        let event = parsed
            .event
            .ok_or_else(|| GatewayError::NotFound(format!("event {}", event_id)))?;

        let detail = Arc::new(normalize::detail(event));
        self.detail_cache
            .insert(event_id, Arc::clone(&detail), self.clock.now_ms())
            .await;
        Ok(detail)
    }

    /// Raw upstream view of a host's first few events; never cached.
    #[instrument(skip(self))]
    pub async fn probe(&self, host_id: &str) -> Result<serde_json::Value> {
        self.run_query("probe", &queries::probe(host_id)).await
    }

    async fn run_query(
        &self,
        operation: &'static str,
        request: &GraphQLRequest,
    ) -> Result<serde_json::Value> {
        let token = self.tokens.get_access_token().await?;

        let started = Instant::now();
        let result = self.graphql.execute(&token, request).await;
        metrics::upstream::request(operation, started.elapsed().as_secs_f64());

        result.map_err(|e| {
            metrics::upstream::error(operation);
            error!(operation, "Upstream query failed: {}", e);
            match e {
                GatewayError::UpstreamQuery(msg) => GatewayError::UpstreamQuery(msg),
                other => GatewayError::UpstreamQuery(other.to_string()),
            }
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| GatewayError::UpstreamQuery(format!("Unexpected response shape: {}", e)))
}
