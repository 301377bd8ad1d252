//! Metrics for the enrichment run
//!
//! Recording goes through the `metrics` facade. Without an installed
//! recorder every call is a no-op, so the exporter is only started when a
//! listen address is configured.

use std::fmt;
use std::net::SocketAddr;

use tracing::info;

use crate::common::error::{GeocoderError, Result};

/// Every metric name used by the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Geocoder client
    LookupsSuccess,
    LookupsError,
    LookupDuration,
    CandidatesReturned,

    // Row enrichment
    RowsMatched,
    RowsUnmatched,
    RowsWithoutTokens,
    MatchLevel,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LookupsSuccess => "geo_geocode_lookups_success_total",
            MetricName::LookupsError => "geo_geocode_lookups_error_total",
            MetricName::LookupDuration => "geo_geocode_lookup_duration_seconds",
            MetricName::CandidatesReturned => "geo_geocode_candidates_returned",
            MetricName::RowsMatched => "geo_enrich_rows_matched_total",
            MetricName::RowsUnmatched => "geo_enrich_rows_unmatched_total",
            MetricName::RowsWithoutTokens => "geo_enrich_rows_without_tokens_total",
            MetricName::MatchLevel => "geo_enrich_match_relaxation_level",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            LookupsSuccess,
            LookupsError,
            LookupDuration,
            CandidatesReturned,
            RowsMatched,
            RowsUnmatched,
            RowsWithoutTokens,
            MatchLevel,
        ]
        .into_iter()
    }

    pub fn is_histogram(&self) -> bool {
        matches!(
            self,
            MetricName::LookupDuration | MetricName::CandidatesReturned | MetricName::MatchLevel
        )
    }

    /// Returns (phase, description)
    pub fn metadata(&self) -> (&'static str, &'static str) {
        match self {
            MetricName::LookupsSuccess => ("geocode", "Lookups answered with a parseable response"),
            MetricName::LookupsError => ("geocode", "Lookups that failed in transport, status or decoding"),
            MetricName::LookupDuration => ("geocode", "Lookup round-trip duration in seconds"),
            MetricName::CandidatesReturned => ("geocode", "Candidates returned per lookup"),
            MetricName::RowsMatched => ("enrich", "Rows that received coordinates"),
            MetricName::RowsUnmatched => ("enrich", "Rows left without coordinates after all variants"),
            MetricName::RowsWithoutTokens => ("enrich", "Rows with no usable location text"),
            MetricName::MatchLevel => ("enrich", "Relaxation level at which a row matched"),
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the Prometheus exporter when `listen_addr` is set.
///
/// Must run inside a tokio runtime. Returns whether an exporter was installed.
pub fn init(listen_addr: Option<&str>) -> Result<bool> {
    let Some(addr) = listen_addr else {
        return Ok(false);
    };
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| GeocoderError::Config(format!("Invalid metrics address '{addr}': {e}")))?;

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| GeocoderError::Config(format!("Failed to start metrics exporter: {e}")))?;

    for name in MetricName::all_metrics() {
        let (phase, description) = name.metadata();
        let description = format!("[{phase}] {description}");
        if name.is_histogram() {
            ::metrics::describe_histogram!(name.as_str(), description);
        } else {
            ::metrics::describe_counter!(name.as_str(), description);
        }
    }
    info!("Prometheus exporter listening at http://{}/metrics", addr);
    Ok(true)
}

// ============================================================================
// Geocoder client
// ============================================================================

pub mod geocode {
    use super::MetricName;

    pub fn lookup_success(duration_secs: f64, candidates: usize) {
        ::metrics::counter!(MetricName::LookupsSuccess.as_str()).increment(1);
        ::metrics::histogram!(MetricName::LookupDuration.as_str()).record(duration_secs);
        ::metrics::histogram!(MetricName::CandidatesReturned.as_str()).record(candidates as f64);
    }

    pub fn lookup_error() {
        ::metrics::counter!(MetricName::LookupsError.as_str()).increment(1);
    }
}

// ============================================================================
// Row enrichment
// ============================================================================

pub mod enrich {
    use super::MetricName;

    pub fn row_matched(level: usize) {
        ::metrics::counter!(MetricName::RowsMatched.as_str()).increment(1);
        ::metrics::histogram!(MetricName::MatchLevel.as_str()).record(level as f64);
    }

    pub fn row_unmatched() {
        ::metrics::counter!(MetricName::RowsUnmatched.as_str()).increment(1);
    }

    pub fn row_without_tokens() {
        ::metrics::counter!(MetricName::RowsWithoutTokens.as_str()).increment(1);
        row_unmatched();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_naming_convention() {
        for name in MetricName::all_metrics() {
            assert!(name.as_str().starts_with("geo_"), "{name}");
            let (phase, _) = name.metadata();
            assert!(name.as_str().starts_with(&format!("geo_{phase}_")), "{name}");
        }
        assert_eq!(
            MetricName::RowsMatched.to_string(),
            "geo_enrich_rows_matched_total"
        );
    }

    #[test]
    fn exporter_is_off_without_address() {
        assert!(!init(None).unwrap());
    }

    #[test]
    fn bad_address_is_rejected() {
        assert!(matches!(init(Some("not an addr")), Err(GeocoderError::Config(_))));
    }
}
