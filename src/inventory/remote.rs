//! HTTP retrieval of the inventory listing

use crate::core::error::{FleetResult, InventoryError};
use std::time::Duration;
use tracing::debug;

/// Timeout for the whole inventory request
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a listing document by URL
pub trait ListingFetcher {
  fn fetch(&self, url: &str) -> FleetResult<String>;
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
  client: reqwest::blocking::Client,
}

impl HttpFetcher {
  pub fn new() -> FleetResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .user_agent(concat!("release-it-check/", env!("CARGO_PKG_VERSION")))
      .timeout(FETCH_TIMEOUT)
      .build()
      .map_err(|e| InventoryError::Fetch {
        url: String::new(),
        reason: format!("failed to create HTTP client: {}", e),
      })?;
    Ok(Self { client })
  }
}

impl ListingFetcher for HttpFetcher {
  fn fetch(&self, url: &str) -> FleetResult<String> {
    let fetch_error = |e: reqwest::Error| InventoryError::Fetch {
      url: url.to_string(),
      reason: e.to_string(),
    };

    let response = self.client.get(url).send().map_err(fetch_error)?;
    let status = response.status();
    debug!("GET {} -> {}", url, status);
    if !status.is_success() {
      return Err(
        InventoryError::Status {
          url: url.to_string(),
          status: status.as_u16(),
        }
        .into(),
      );
    }

    Ok(response.text().map_err(fetch_error)?)
  }
}
