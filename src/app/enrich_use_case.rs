use tracing::{debug, info, warn};

use crate::app::ports::{AttemptProgress, GeocoderPort, PacerPort, ProgressPort};
use crate::common::error::Result;
use crate::common::types::{GeoMatch, OUTPUT_FIELDS};
use crate::config::GeocodePolicy;
use crate::observability::metrics;
use crate::pipeline::processing::location::LocationBuilder;
use crate::pipeline::processing::selector::CandidateSelector;
use crate::pipeline::storage::table::Table;

/// Result of geocoding one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub geo_match: Option<GeoMatch>,
    /// Lookups issued for the row
    pub attempts: usize,
}

/// Statistics for one enrichment run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichStats {
    pub total_rows: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    /// Unmatched rows whose location produced no tokens at all
    pub empty_rows: usize,
    pub lookups: usize,
}

/// Geocodes every row of a table by relaxing its location query until the
/// service returns an acceptable candidate.
///
/// Rows are processed strictly one after another and each row's variants
/// in relaxation order; nothing is looked up concurrently.
pub struct EnrichUseCase {
    geocoder: Box<dyn GeocoderPort>,
    pacer: Box<dyn PacerPort>,
    progress: Box<dyn ProgressPort>,
    policy: GeocodePolicy,
}

impl EnrichUseCase {
    pub fn new(
        geocoder: Box<dyn GeocoderPort>,
        pacer: Box<dyn PacerPort>,
        progress: Box<dyn ProgressPort>,
        policy: GeocodePolicy,
    ) -> Self {
        Self {
            geocoder,
            pacer,
            progress,
            policy,
        }
    }

    /// Geocode a single row given its three location cells.
    ///
    /// Stops at the first variant with a match. Every lookup that does not
    /// match is followed by a pause. A lookup error aborts the row.
    pub async fn enrich_row(
        &self,
        fields: [&str; 3],
        row: usize,
        total_rows: usize,
    ) -> Result<RowOutcome> {
        let query = LocationBuilder::new(&self.policy).build(fields);
        let selector = CandidateSelector::new(&self.policy);

        let variants = query.variants();
        let total_attempts = variants.len();
        if total_attempts == 0 {
            warn!(row, "Row has no usable location text, leaving it unmatched");
            metrics::enrich::row_without_tokens();
            return Ok(RowOutcome {
                geo_match: None,
                attempts: 0,
            });
        }

        for (index, variant) in variants.enumerate() {
            self.progress.attempt(&AttemptProgress {
                row,
                total_rows,
                attempt: index + 1,
                total_attempts,
            });
            debug!(row, level = variant.level, query = %variant.text, "Looking up variant");

            let candidates = self.geocoder.lookup(&variant.text).await?;
            if let Some(geo_match) = selector.select(&candidates, &variant) {
                debug!(row, query = %variant.text, object = %geo_match.object_name, "Matched");
                metrics::enrich::row_matched(variant.level);
                return Ok(RowOutcome {
                    geo_match: Some(geo_match),
                    attempts: index + 1,
                });
            }

            self.pacer.pause().await;
        }

        metrics::enrich::row_unmatched();
        Ok(RowOutcome {
            geo_match: None,
            attempts: total_attempts,
        })
    }

    /// Validate the location columns, add the output columns and fill them
    /// row by row. The table is only modified in memory.
    pub async fn enrich_table(&self, table: &mut Table, column_names: &[String]) -> Result<EnrichStats> {
        let columns = table.resolve_location_columns(column_names)?;
        let first_output = table.insert_output_columns(columns.anchor());
        let [first, second, third] = columns.indices_after_insertion();

        let total_rows = table.row_count();
        let mut stats = EnrichStats {
            total_rows,
            ..Default::default()
        };
        info!(
            rows = total_rows,
            columns = ?columns.names,
            "Starting enrichment"
        );

        for row in 0..total_rows {
            let fields = [
                table.cell(row, first),
                table.cell(row, second),
                table.cell(row, third),
            ];
            let outcome = self.enrich_row(fields, row + 1, total_rows).await?;
            stats.lookups += outcome.attempts;

            match outcome.geo_match {
                Some(geo_match) => {
                    for (offset, field) in OUTPUT_FIELDS.iter().enumerate() {
                        table.set_cell(row, first_output + offset, field.value(&geo_match));
                    }
                    stats.matched_rows += 1;
                }
                None => {
                    if outcome.attempts == 0 {
                        stats.empty_rows += 1;
                    }
                    stats.unmatched_rows += 1;
                }
            }
        }

        self.progress.finish();
        info!(
            matched = stats.matched_rows,
            unmatched = stats.unmatched_rows,
            lookups = stats.lookups,
            "Enrichment finished"
        );
        Ok(stats)
    }
}
