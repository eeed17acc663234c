#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PlotDefaults;
use crate::dataset::ConsolidatedDataset;
use crate::error::ReportError;
use crate::generator::ReportScope;
use crate::render::{ChartKind, PlotMetadata};
use crate::request::ReportRequest;
use crate::source::SourceError;
use crate::units::UnknownUnitError;

/// The raw-data artifact a data handler produces; this is what the data
/// cache stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    /// Exact values at base-unit scale.
    pub dataset: ConsolidatedDataset,
    /// Independent copy at the display unit's scale.
    pub graph_dataset: ConsolidatedDataset,
    pub granularity_secs: i64,
    /// Maximum of the graph copy.
    pub max_value: f64,
    pub unit_label: String,
}

/// Failures a data handler can produce.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Unit(#[from] UnknownUnitError),
}

/// Retrieves and shapes the data for one report.
#[async_trait]
pub trait DataHandler: Send + Sync {
    async fn retrieve(&self, scope: &ReportScope<'_>) -> Result<ReportData, HandlerError>;
}

/// Chooses the chart family and supplies the rendering metadata for one
/// report.
pub trait PlotHandler: Send + Sync {
    fn chart_kind(&self) -> ChartKind;

    fn metadata(
        &self,
        request: &ReportRequest,
        data: &ReportData,
        defaults: &PlotDefaults,
    ) -> PlotMetadata;
}

pub(crate) struct RegisteredReport {
    pub(crate) data: Arc<dyn DataHandler>,
    pub(crate) plot: Arc<dyn PlotHandler>,
}

struct DataRegistration {
    id: String,
    display_name: Option<String>,
    handler: Arc<dyn DataHandler>,
}

/// Collects data and plot handlers; `build` pairs them eagerly so a data
/// handler without its plot counterpart is caught at start-up, not at
/// first use.
#[derive(Default)]
pub struct ReportRegistryBuilder {
    data: Vec<DataRegistration>,
    plots: HashMap<String, Arc<dyn PlotHandler>>,
}

impl ReportRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a data handler whose display name is the identifier itself.
    pub fn data_handler(self, id: impl Into<String>, handler: Arc<dyn DataHandler>) -> Self {
        self.register_data(id.into(), None, handler)
    }

    /// Register a data handler with a human-readable display name.
    pub fn named_data_handler(
        self,
        id: impl Into<String>,
        display_name: impl Into<String>,
        handler: Arc<dyn DataHandler>,
    ) -> Self {
        self.register_data(id.into(), Some(display_name.into()), handler)
    }

    pub fn plot_handler(mut self, id: impl Into<String>, handler: Arc<dyn PlotHandler>) -> Self {
        self.plots.insert(id.into(), handler);
        self
    }

    pub fn build(self) -> Result<ReportRegistry, ReportError> {
        let mut plots = self.plots;
        let mut reports = HashMap::new();
        let mut by_display = BTreeMap::new();

        for registration in self.data {
            let plot = plots
                .remove(&registration.id)
                .ok_or_else(|| ReportError::PlotHandlerNotFound(registration.id.clone()))?;
            let display_name = registration
                .display_name
                .unwrap_or_else(|| registration.id.clone());
            by_display.insert(display_name, registration.id.clone());
            reports.insert(
                registration.id,
                RegisteredReport {
                    data: registration.handler,
                    plot,
                },
            );
        }

        Ok(ReportRegistry {
            by_display,
            reports,
        })
    }

    fn register_data(
        mut self,
        id: String,
        display_name: Option<String>,
        handler: Arc<dyn DataHandler>,
    ) -> Self {
        self.data.push(DataRegistration {
            id,
            display_name,
            handler,
        });
        self
    }
}

/// Immutable report table: display name to identifier both ways, one
/// (data handler, plot handler) pair per identifier.
pub struct ReportRegistry {
    by_display: BTreeMap<String, String>,
    reports: HashMap<String, RegisteredReport>,
}

impl ReportRegistry {
    pub fn builder() -> ReportRegistryBuilder {
        ReportRegistryBuilder::new()
    }

    /// Sorted display names of every registered report.
    pub fn plots_list(&self) -> Vec<String> {
        self.by_display.keys().cloned().collect()
    }

    /// Map a display name to its identifier. A name that already is an
    /// identifier passes through unchanged.
    pub fn resolve(&self, name: &str) -> Result<String, ReportError> {
        if let Some(id) = self.by_display.get(name) {
            return Ok(id.clone());
        }
        if self.reports.contains_key(name) {
            return Ok(name.to_string());
        }
        Err(ReportError::ReportNotFound(name.to_string()))
    }

    pub(crate) fn report(&self, id: &str) -> Result<&RegisteredReport, ReportError> {
        self.reports
            .get(id)
            .ok_or_else(|| ReportError::ReportNotFound(id.to_string()))
    }

    pub(crate) fn plot_handler(&self, id: &str) -> Result<&Arc<dyn PlotHandler>, ReportError> {
        self.reports
            .get(id)
            .map(|report| &report.plot)
            .ok_or_else(|| ReportError::PlotHandlerNotFound(id.to_string()))
    }
}
