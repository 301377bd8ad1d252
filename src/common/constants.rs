//! Geocoding service and lookup policy defaults.
//! Anything here can be overridden through the config file or environment.

// Nominatim free-form search endpoint
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

// Nominatim rejects requests without an identifying agent
pub const DEFAULT_USER_AGENT: &str = concat!("geo_enricher/", env!("CARGO_PKG_VERSION"));

/// Results requested per lookup. Only the first `LOOKUP_LIMIT` are inspected.
pub const DEFAULT_RESULT_LIMIT: u32 = 50;

/// Pause after every lookup that did not produce a match.
pub const DEFAULT_DELAY_MS: u64 = 200;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// Candidate acceptance predicate
pub const LOOKUP_CLASSES: &[&str] = &["boundary", "place"];
pub const LOOKUP_TYPES: &[&str] = &["administrative", "village"];
pub const LOOKUP_LIMIT: usize = 3;

/// Textual marker for an absent cell value.
pub const MISSING_VALUE: &str = "nan";

/// Number of location columns the `--columns` flag must name.
pub const LOCATION_COLUMN_COUNT: usize = 3;

pub const DEFAULT_CONFIG_FILE: &str = "geo_enricher.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "geo_enricher.log";

// Environment overrides
pub const ENV_ENDPOINT: &str = "GEO_ENRICHER_ENDPOINT";
pub const ENV_USER_AGENT: &str = "GEO_ENRICHER_USER_AGENT";
pub const ENV_DELAY_MS: &str = "GEO_ENRICHER_DELAY_MS";
pub const ENV_TIMEOUT_SECONDS: &str = "GEO_ENRICHER_TIMEOUT_SECONDS";
pub const ENV_METRICS_ADDR: &str = "GEO_ENRICHER_METRICS_ADDR";
