use crate::app::ports::PacerPort;
use async_trait::async_trait;
use std::time::Duration;

/// Sleeps a fixed interval between lookups to honor the service usage policy.
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PacerPort for FixedDelayPacer {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
