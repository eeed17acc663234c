use std::sync::Arc;

use async_trait::async_trait;

use super::scope::ReportScope;
use crate::config::PlotDefaults;
use crate::dataset::{fill_with_zero, Consolidation};
use crate::error::ReportError;
use crate::registry::{
    DataHandler, HandlerError, PlotHandler, ReportData, ReportRegistry,
};
use crate::render::{ChartKind, PlotMetadata};
use crate::request::ReportRequest;
use crate::units::find_suitable_unit;

/// Registry with the stock reports of a value-carrying monitoring type:
/// `Eff`, `Average Value`, `Total Value` and `Cumulative Value`.
/// `quantity` names the unit family of the measured value (`"jobs"`,
/// `"bytes"`, ...).
pub fn stock_registry(quantity: &'static str) -> Result<ReportRegistry, ReportError> {
    ReportRegistry::builder()
        .data_handler("Eff", Arc::new(EfficiencyData))
        .plot_handler("Eff", Arc::new(QualityPlot { title: "Efficiency" }))
        .named_data_handler(
            "Average",
            "Average Value",
            Arc::new(ConsolidatedValueData {
                consolidation: Consolidation::Average,
                quantity,
            }),
        )
        .plot_handler(
            "Average",
            Arc::new(TimedPlot {
                kind: ChartKind::StackedLine,
                title: "Average Value",
            }),
        )
        .named_data_handler(
            "Total",
            "Total Value",
            Arc::new(ConsolidatedValueData {
                consolidation: Consolidation::Sum,
                quantity,
            }),
        )
        .plot_handler(
            "Total",
            Arc::new(TimedPlot {
                kind: ChartKind::StackedBar,
                title: "Total Value",
            }),
        )
        .named_data_handler(
            "Cumulative",
            "Cumulative Value",
            Arc::new(ConsolidatedValueData {
                consolidation: Consolidation::Sum,
                quantity,
            }),
        )
        .plot_handler(
            "Cumulative",
            Arc::new(TimedPlot {
                kind: ChartKind::Cumulative,
                title: "Cumulative Value",
            }),
        )
        .build()
}

/// Efficiency per bucket over `[sum, count]` rows, reported as a
/// percentage; the unit never rescales.
struct EfficiencyData;

#[async_trait]
impl DataHandler for EfficiencyData {
    async fn retrieve(&self, scope: &ReportScope<'_>) -> Result<ReportData, HandlerError> {
        let (raw, granularity_secs) = scope.timed_data(&["sum", "count"]).await?;
        let consolidated = raw.consolidate(Consolidation::Efficiency);
        let filled = fill_with_zero(
            granularity_secs,
            scope.request().start_time.timestamp(),
            scope.request().end_time.timestamp(),
            consolidated,
        );
        let max_value = filled.max_value();
        Ok(ReportData {
            graph_dataset: filled.clone(),
            dataset: filled,
            granularity_secs,
            max_value,
            unit_label: "%".to_string(),
        })
    }
}

/// Consolidated value per bucket, gap-filled and rescaled to a readable
/// unit of the configured quantity.
struct ConsolidatedValueData {
    consolidation: Consolidation,
    quantity: &'static str,
}

#[async_trait]
impl DataHandler for ConsolidatedValueData {
    async fn retrieve(&self, scope: &ReportScope<'_>) -> Result<ReportData, HandlerError> {
        let select_fields: &[&str] = match self.consolidation {
            Consolidation::Sum => &["sum"],
            Consolidation::Average | Consolidation::Efficiency => &["sum", "count"],
        };
        let (raw, granularity_secs) = scope.timed_data(select_fields).await?;
        let consolidated = raw.consolidate(self.consolidation);
        let filled = fill_with_zero(
            granularity_secs,
            scope.request().start_time.timestamp(),
            scope.request().end_time.timestamp(),
            consolidated,
        );
        let max_value = filled.max_value();
        let selection = find_suitable_unit(
            filled,
            max_value,
            self.quantity,
            scope.options().static_units,
        )?;
        Ok(ReportData {
            dataset: selection.report_data,
            graph_dataset: selection.graph_data,
            granularity_secs,
            max_value: selection.max_value,
            unit_label: selection.unit_label.to_string(),
        })
    }
}

struct TimedPlot {
    kind: ChartKind,
    title: &'static str,
}

impl PlotHandler for TimedPlot {
    fn chart_kind(&self) -> ChartKind {
        self.kind
    }

    fn metadata(
        &self,
        request: &ReportRequest,
        data: &ReportData,
        defaults: &PlotDefaults,
    ) -> PlotMetadata {
        let grouping = request
            .grouping
            .first()
            .map(String::as_str)
            .unwrap_or("series");
        PlotMetadata::from_defaults(defaults)
            .with_title(format!("{} by {}", self.title, grouping))
            .with_ylabel(data.unit_label.clone())
            .with_span_secs(data.granularity_secs)
    }
}

struct QualityPlot {
    title: &'static str,
}

impl PlotHandler for QualityPlot {
    fn chart_kind(&self) -> ChartKind {
        ChartKind::Quality
    }

    fn metadata(
        &self,
        request: &ReportRequest,
        data: &ReportData,
        defaults: &PlotDefaults,
    ) -> PlotMetadata {
        let grouping = request
            .grouping
            .first()
            .map(String::as_str)
            .unwrap_or("series");
        PlotMetadata::from_defaults(defaults)
            .with_title(format!("{} by {}", self.title, grouping))
            .with_span_secs(data.granularity_secs)
    }
}
