use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid monitoring type {name}: {reason}")]
pub struct MonitoringTypeError {
    name: String,
    reason: String,
}

/// Descriptor for one measurement category: which fields identify a
/// series and which carry the plotted values. Checked at construction and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct MonitoringType {
    name: String,
    key_fields: Vec<String>,
    monitoring_fields: Vec<String>,
    data_to_keep_secs: Option<i64>,
}

impl MonitoringType {
    pub fn new(
        name: impl Into<String>,
        key_fields: Vec<String>,
        monitoring_fields: Vec<String>,
    ) -> Result<Self, MonitoringTypeError> {
        let name = name.into();
        if key_fields.is_empty() {
            return Err(MonitoringTypeError {
                name,
                reason: "key fields have to be provided".to_string(),
            });
        }
        if monitoring_fields.is_empty() {
            return Err(MonitoringTypeError {
                name,
                reason: "monitoring fields have to be provided".to_string(),
            });
        }
        Ok(Self {
            name,
            key_fields,
            monitoring_fields,
            data_to_keep_secs: None,
        })
    }

    /// Keep only this much history; `None` keeps everything.
    pub fn with_retention_secs(mut self, secs: i64) -> Self {
        self.data_to_keep_secs = Some(secs);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    pub fn monitoring_fields(&self) -> &[String] {
        &self.monitoring_fields
    }

    pub fn data_to_keep_secs(&self) -> Option<i64> {
        self.data_to_keep_secs
    }

    pub fn is_key_field(&self, field: &str) -> bool {
        self.key_fields.iter().any(|key| key == field)
    }

    /// Storage index derived from the type name.
    pub fn index_name(&self) -> String {
        format!("{}-index", self.name.to_lowercase())
    }
}
