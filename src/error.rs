use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to fetch access token: {0}")]
    UpstreamAuth(String),

    #[error("Upstream query failed: {0}")]
    UpstreamQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GatewayError {
    /// HTTP status used when this error reaches the request boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
