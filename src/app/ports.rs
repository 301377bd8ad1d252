use async_trait::async_trait;

use crate::common::error::Result;
use crate::common::types::Candidate;

/// Free-form search against a geocoding service.
#[async_trait]
pub trait GeocoderPort: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>>;
}

/// Pacing between lookups that did not produce a match.
#[async_trait]
pub trait PacerPort: Send + Sync {
    async fn pause(&self);
}

/// Position of one lookup attempt within the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttemptProgress {
    /// 1-based row number
    pub row: usize,
    pub total_rows: usize,
    /// 1-based attempt number within the row
    pub attempt: usize,
    pub total_attempts: usize,
}

pub trait ProgressPort: Send + Sync {
    fn attempt(&self, progress: &AttemptProgress);
    fn finish(&self) {}
}
