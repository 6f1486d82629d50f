use axum::{
    extract::{Query, State},
    http::Method,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::Server;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::constants::effective_timeslot_limit;
use crate::error::GatewayError;
use crate::gateway::EventGateway;
use crate::observability::metrics;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<EventGateway>,
}

impl AppState {
    pub fn new(gateway: EventGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Query pairs in arrival order. Repeated keys are allowed by the extractor
/// and resolved by [`first_value`].
type QueryPairs = Query<Vec<(String, String)>>;

/// First value given for `key`, ignoring any repeats
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

/// Raw query values of the events endpoint; interpreted by the handler
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventsParams {
    pub host_id: Option<String>,
    pub event_id: Option<String>,
    pub timeslot_limit: Option<String>,
}

impl EventsParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            host_id: first_value(pairs, "hostId"),
            event_id: first_value(pairs, "eventId"),
            timeslot_limit: first_value(pairs, "timeslotLimit"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProbeParams {
    pub host_id: Option<String>,
}

impl ProbeParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            host_id: first_value(pairs, "hostId"),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            GatewayError::NotFound(_) => json!({ "error": "Event not found" }),
            other => json!({
                "error": "Failed to fetch events from Universe",
                "details": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "event-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn prometheus_metrics() -> impl IntoResponse {
    metrics::render()
}

/// List view, or detail view when a non-empty `eventId` is present
async fn events(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Response, GatewayError> {
    let params = EventsParams::from_pairs(&pairs);
    if let Some(event_id) = params.event_id.as_deref().filter(|id| !id.is_empty()) {
        let detail = state.gateway.get_event_detail(event_id).await.map_err(|e| {
            if !matches!(e, GatewayError::NotFound(_)) {
                error!(event_id, "API route error: {}", e);
            }
            e
        })?;
        return Ok(Json(detail.as_ref()).into_response());
    }

    let host_id = state.gateway.resolve_host_id(params.host_id.as_deref());
    let timeslot_limit = effective_timeslot_limit(params.timeslot_limit.as_deref());

    let list = state
        .gateway
        .get_event_list(&host_id, Some(timeslot_limit))
        .await
        .map_err(|e| {
            error!(host_id = %host_id, "API route error: {}", e);
            e
        })?;
    Ok(Json(list.as_ref()).into_response())
}

/// Raw upstream connectivity check for a host
async fn probe(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Response, GatewayError> {
    let params = ProbeParams::from_pairs(&pairs);
    let host_id = state.gateway.resolve_host_id(params.host_id.as_deref());
    let data = state.gateway.probe(&host_id).await?;
    Ok(Json(data).into_response())
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .route("/events", get(events))
        .route("/api/universe/events", get(events))
        .route("/api/probe", get(probe))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://localhost:{port}");
    println!("🚀 Event gateway running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("🎟️  Events:       http://localhost:{port}/events");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let params = EventsParams::from_pairs(&pairs(&[
            ("hostId", "a"),
            ("timeslotLimit", "5"),
            ("hostId", "b"),
            ("timeslotLimit", "9"),
        ]));
        assert_eq!(params.host_id.as_deref(), Some("a"));
        assert_eq!(params.timeslot_limit.as_deref(), Some("5"));
        assert!(params.event_id.is_none());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let params =
            ProbeParams::from_pairs(&pairs(&[("utm_source", "mail"), ("hostId", "h")]));
        assert_eq!(params.host_id.as_deref(), Some("h"));
        assert_eq!(EventsParams::from_pairs(&[]), EventsParams::default());
    }
}
