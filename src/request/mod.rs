mod options;

#[cfg(test)]
mod tests;

pub use options::ReportOptions;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ReportError;

/// One report request. The content hash covers every semantic field, so
/// two structurally equal requests collide in the cache and two distinct
/// requests never do.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub type_name: String,
    /// Display name or raw identifier of the report.
    pub report_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Ordered grouping fields; the order is part of the request's content.
    pub grouping: Vec<String>,
    /// Field to admissible values. The values form a set: their order is
    /// not part of the request's content.
    pub key_filters: BTreeMap<String, Vec<String>>,
    pub options: ReportOptions,
    pub generate_plot: bool,
}

impl ReportRequest {
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.start_time >= self.end_time {
            return Err(ReportError::InvalidRequest(format!(
                "start_time {} must precede end_time {}",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }

    /// Hex SHA-256 over a canonical length-delimited encoding of every
    /// semantic field. `generate_plot` stays out of the hash: it selects
    /// which pipeline stages run, not what the artifacts contain.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        feed_str(&mut hasher, &self.type_name);
        feed_str(&mut hasher, &self.report_name);
        hasher.update(self.start_time.timestamp().to_be_bytes());
        hasher.update(self.end_time.timestamp().to_be_bytes());

        hasher.update((self.grouping.len() as u64).to_be_bytes());
        for field in &self.grouping {
            feed_str(&mut hasher, field);
        }

        hasher.update((self.key_filters.len() as u64).to_be_bytes());
        for (field, values) in &self.key_filters {
            feed_str(&mut hasher, field);
            let mut values = values.clone();
            values.sort();
            hasher.update((values.len() as u64).to_be_bytes());
            for value in &values {
                feed_str(&mut hasher, value);
            }
        }

        self.options.feed(&mut hasher);

        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}

fn feed_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_be_bytes());
    hasher.update(value.as_bytes());
}
