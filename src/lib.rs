pub mod config;
pub mod constants;
pub mod cta;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod observability;
pub mod server;
pub mod types;

// Layered boundaries: ports in app, reqwest/chrono adapters in infra
pub mod app;
pub mod infra;
