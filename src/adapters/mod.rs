// Adapters layer: concrete implementations for external systems (geocoding, statistics).

pub mod sparql;
pub mod statistics;
pub mod what3words;

use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// 所有對外請求都必須有明確逾時
pub fn build_http_client(timeout_seconds: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("agr-map/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
