// Query processing: location normalization, relaxation and candidate selection

pub mod location;
pub mod relaxation;
pub mod selector;

pub use location::{LocationBuilder, LocationQuery};
pub use relaxation::{relax, QueryVariant, Relaxation};
pub use selector::CandidateSelector;
