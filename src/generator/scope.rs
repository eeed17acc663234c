use std::collections::BTreeMap;

use crate::dataset::BucketedDataset;
use crate::request::{ReportOptions, ReportRequest};
use crate::source::{BucketQuery, DataSource, SourceError};
use crate::types::MonitoringType;

/// Handler-facing view of one request: bucket planning, key-field-safe
/// filter projection and bucketed retrieval against the store.
pub struct ReportScope<'a> {
    source: &'a dyn DataSource,
    request: &'a ReportRequest,
    monitoring_type: &'a MonitoringType,
}

impl<'a> ReportScope<'a> {
    pub(crate) fn new(
        source: &'a dyn DataSource,
        request: &'a ReportRequest,
        monitoring_type: &'a MonitoringType,
    ) -> Self {
        Self {
            source,
            request,
            monitoring_type,
        }
    }

    pub fn request(&self) -> &ReportRequest {
        self.request
    }

    pub fn options(&self) -> &ReportOptions {
        &self.request.options
    }

    pub fn monitoring_type(&self) -> &MonitoringType {
        self.monitoring_type
    }

    /// Bucketed retrieval at display granularity: plans the bucket size,
    /// projects the filters onto the type's key fields and queries the
    /// store. Returns the dataset together with the bucket granularity.
    pub async fn timed_data(
        &self,
        select_fields: &[&str],
    ) -> Result<(BucketedDataset, i64), SourceError> {
        let span = self
            .source
            .determine_bucket_size(self.request.start_time, self.request.end_time)?;
        let query = self.bucket_query(select_fields, span.interval_secs);
        let dataset = self.source.retrieve_bucketed_data(&query).await?;
        Ok((dataset, span.granularity_secs))
    }

    /// Same retrieval without the granularity, for summary-style reports.
    pub async fn summary_data(
        &self,
        select_fields: &[&str],
    ) -> Result<BucketedDataset, SourceError> {
        let (dataset, _) = self.timed_data(select_fields).await?;
        Ok(dataset)
    }

    fn bucket_query(&self, select_fields: &[&str], interval_secs: i64) -> BucketQuery {
        // only filters on the type's declared key fields reach the store
        let filters: BTreeMap<String, Vec<String>> = self
            .request
            .key_filters
            .iter()
            .filter(|(field, _)| self.monitoring_type.is_key_field(field))
            .map(|(field, values)| (field.clone(), values.clone()))
            .collect();

        BucketQuery {
            type_name: self.request.type_name.clone(),
            start: self.request.start_time,
            end: self.request.end_time,
            interval_secs,
            select_fields: select_fields.iter().map(|field| field.to_string()).collect(),
            filters,
            grouping: self.request.grouping.clone(),
        }
    }
}
