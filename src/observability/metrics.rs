//! Gateway metrics recorded through the `metrics` facade.
//!
//! A Prometheus recorder is installed at most once per process; until then
//! every recording call is a no-op, which keeps tests and CLI runs quiet.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Enum representing all metric names used by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    CacheHits,
    CacheMisses,
    TokenRefreshes,
    TokenErrors,
    UpstreamRequests,
    UpstreamErrors,
    UpstreamDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CacheHits => "gateway_cache_hits_total",
            MetricName::CacheMisses => "gateway_cache_misses_total",
            MetricName::TokenRefreshes => "gateway_token_refreshes_total",
            MetricName::TokenErrors => "gateway_token_errors_total",
            MetricName::UpstreamRequests => "gateway_upstream_requests_total",
            MetricName::UpstreamErrors => "gateway_upstream_errors_total",
            MetricName::UpstreamDuration => "gateway_upstream_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            CacheHits,
            CacheMisses,
            TokenRefreshes,
            TokenErrors,
            UpstreamRequests,
            UpstreamErrors,
            UpstreamDuration,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder. Idempotent; returns the render handle
/// when installation succeeded.
pub fn init() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                for name in MetricName::all_metrics() {
                    describe(name);
                }
                info!("Prometheus recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
                None
            }
        })
        .clone()
}

/// Prometheus text exposition, empty when no recorder is installed
pub fn render() -> String {
    HANDLE
        .get()
        .and_then(|h| h.as_ref())
        .map(|h| h.render())
        .unwrap_or_default()
}

fn describe(name: MetricName) {
    let help = match name {
        MetricName::CacheHits => "Requests served from the in-memory cache",
        MetricName::CacheMisses => "Requests that missed the cache or found an expired entry",
        MetricName::TokenRefreshes => "Successful client-credentials exchanges",
        MetricName::TokenErrors => "Failed client-credentials exchanges",
        MetricName::UpstreamRequests => "GraphQL requests sent upstream",
        MetricName::UpstreamErrors => "GraphQL requests that failed",
        MetricName::UpstreamDuration => "GraphQL round-trip time in seconds",
    };
    match name {
        MetricName::UpstreamDuration => ::metrics::describe_histogram!(name.as_str(), help),
        _ => ::metrics::describe_counter!(name.as_str(), help),
    }
}

pub mod cache {
    use super::MetricName;

    pub fn hit(cache: &'static str) {
        ::metrics::counter!(MetricName::CacheHits.as_str(), "cache" => cache).increment(1);
    }

    pub fn miss(cache: &'static str) {
        ::metrics::counter!(MetricName::CacheMisses.as_str(), "cache" => cache).increment(1);
    }
}

pub mod token {
    use super::MetricName;

    pub fn refreshed() {
        ::metrics::counter!(MetricName::TokenRefreshes.as_str()).increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::TokenErrors.as_str()).increment(1);
    }
}

pub mod upstream {
    use super::MetricName;

    pub fn request(operation: &'static str, duration_secs: f64) {
        ::metrics::counter!(MetricName::UpstreamRequests.as_str(), "operation" => operation)
            .increment(1);
        ::metrics::histogram!(MetricName::UpstreamDuration.as_str(), "operation" => operation)
            .record(duration_secs);
    }

    pub fn error(operation: &'static str) {
        ::metrics::counter!(MetricName::UpstreamErrors.as_str(), "operation" => operation)
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_unique_and_prefixed() {
        let names: Vec<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        assert!(names.iter().all(|n| n.starts_with("gateway_")));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        cache::hit("list");
        cache::miss("detail");
        token::refreshed();
        upstream::request("list", 0.01);
        upstream::error("detail");
    }
}
