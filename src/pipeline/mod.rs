// Enrichment pipeline: query processing and table storage

pub mod processing;
pub mod storage;
