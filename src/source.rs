use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::dataset::BucketedDataset;

/// Error surfaced by the time-series storage collaborator.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Bucket planning result: the query interval and the display granularity
/// buckets are aligned to.
#[derive(Debug, Clone, Copy)]
pub struct BucketSpan {
    pub interval_secs: i64,
    pub granularity_secs: i64,
}

/// One bucketed retrieval against the storage layer.
#[derive(Debug, Clone)]
pub struct BucketQuery {
    pub type_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval_secs: i64,
    pub select_fields: Vec<String>,
    pub filters: BTreeMap<String, Vec<String>>,
    pub grouping: Vec<String>,
}

/// The aggregated time-series store the engine reads from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Plan the bucket width for a time range.
    fn determine_bucket_size(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BucketSpan, SourceError>;

    /// Retrieve aggregated rows bucketed at `query.interval_secs`.
    async fn retrieve_bucketed_data(
        &self,
        query: &BucketQuery,
    ) -> Result<BucketedDataset, SourceError>;
}
