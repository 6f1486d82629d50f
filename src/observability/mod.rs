// Observability: Prometheus metrics for cache, token and upstream activity

pub mod metrics;
