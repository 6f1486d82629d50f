use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::Result;

/// Shared reqwest client for both upstream endpoints. Without a configured
/// timeout the client's own default applies.
pub fn build_http_client(config: &UpstreamConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("event-gateway/", env!("CARGO_PKG_VERSION")));

    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}
