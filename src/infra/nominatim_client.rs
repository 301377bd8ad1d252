use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::app::ports::GeocoderPort;
use crate::common::error::{GeocoderError, Result};
use crate::common::types::Candidate;
use crate::config::GeocoderConfig;
use crate::observability::metrics;

/// Nominatim search client.
pub struct NominatimClient {
    client: reqwest::Client,
    endpoint: String,
    result_limit: u32,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            result_limit: config.result_limit,
        })
    }
}

#[async_trait]
impl GeocoderPort for NominatimClient {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>> {
        let started = Instant::now();
        let limit = self.result_limit.to_string();
        let params = [
            ("addressdetails", "1"),
            ("q", query),
            ("format", "json"),
            ("limit", limit.as_str()),
        ];

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                metrics::geocode::lookup_error();
                e
            })?;
        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            metrics::geocode::lookup_error();
            return Err(GeocoderError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).chars().take(200).collect(),
            });
        }

        let candidates: Vec<Candidate> = serde_json::from_slice(&body).map_err(|e| {
            metrics::geocode::lookup_error();
            e
        })?;
        let elapsed = started.elapsed().as_secs_f64();
        debug!(candidates = candidates.len(), elapsed_secs = elapsed, "Lookup completed");
        metrics::geocode::lookup_success(elapsed, candidates.len());
        Ok(candidates)
    }
}
