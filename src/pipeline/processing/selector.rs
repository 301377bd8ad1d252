use crate::common::types::{Candidate, GeoMatch};
use crate::config::GeocodePolicy;
use crate::pipeline::processing::relaxation::QueryVariant;
use tracing::trace;

/// Picks the first acceptable candidate out of a geocoder response.
pub struct CandidateSelector<'a> {
    policy: &'a GeocodePolicy,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(policy: &'a GeocodePolicy) -> Self {
        Self { policy }
    }

    /// Only the first `candidate_limit` candidates are inspected, in response
    /// order. A candidate lacking `class` or `type` counts as a non-match, as
    /// does one lacking any of the values copied into the output.
    pub fn select(&self, candidates: &[Candidate], variant: &QueryVariant) -> Option<GeoMatch> {
        candidates
            .iter()
            .take(self.policy.candidate_limit)
            .find_map(|candidate| self.accept(candidate, variant))
    }

    pub fn accepts(&self, candidate: &Candidate) -> bool {
        match (candidate.class.as_deref(), candidate.kind.as_deref()) {
            (Some(class), Some(kind)) => {
                self.policy.classes.iter().any(|c| c == class)
                    && self.policy.types.iter().any(|t| t == kind)
            }
            _ => false,
        }
    }

    fn accept(&self, candidate: &Candidate, variant: &QueryVariant) -> Option<GeoMatch> {
        if !self.accepts(candidate) {
            return None;
        }
        let geo_match = GeoMatch::from_candidate(candidate, &variant.text);
        if geo_match.is_none() {
            trace!(query = %variant.text, "accepted class/type but incomplete candidate skipped");
        }
        geo_match
    }
}
