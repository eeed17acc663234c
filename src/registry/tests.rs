use std::sync::Arc;

use async_trait::async_trait;

use super::{DataHandler, HandlerError, PlotHandler, ReportData, ReportRegistry};
use crate::config::PlotDefaults;
use crate::error::ReportError;
use crate::generator::ReportScope;
use crate::render::{ChartKind, PlotMetadata};
use crate::request::ReportRequest;

struct StubData;

#[async_trait]
impl DataHandler for StubData {
    async fn retrieve(&self, _scope: &ReportScope<'_>) -> Result<ReportData, HandlerError> {
        Ok(ReportData::default())
    }
}

struct StubPlot;

impl PlotHandler for StubPlot {
    fn chart_kind(&self) -> ChartKind {
        ChartKind::StackedLine
    }

    fn metadata(
        &self,
        _request: &ReportRequest,
        _data: &ReportData,
        defaults: &PlotDefaults,
    ) -> PlotMetadata {
        PlotMetadata::from_defaults(defaults)
    }
}

fn two_report_registry() -> ReportRegistry {
    ReportRegistry::builder()
        .named_data_handler("Total", "Total Value", Arc::new(StubData))
        .plot_handler("Total", Arc::new(StubPlot))
        .data_handler("Eff", Arc::new(StubData))
        .plot_handler("Eff", Arc::new(StubPlot))
        .build()
        .expect("paired registry builds")
}

#[test]
fn lists_sorted_display_names() {
    let registry = two_report_registry();
    assert_eq!(registry.plots_list(), vec!["Eff", "Total Value"]);
}

#[test]
fn resolves_display_name_to_identifier() {
    let registry = two_report_registry();
    assert_eq!(registry.resolve("Total Value").expect("known name"), "Total");
}

#[test]
fn display_name_defaults_to_identifier() {
    let registry = two_report_registry();
    assert_eq!(registry.resolve("Eff").expect("known name"), "Eff");
}

#[test]
fn raw_identifier_passes_through() {
    let registry = two_report_registry();
    assert_eq!(registry.resolve("Total").expect("known id"), "Total");
}

#[test]
fn unknown_name_is_report_not_found() {
    let registry = two_report_registry();
    let error = registry.resolve("Nope").expect_err("unknown name");
    assert!(matches!(error, ReportError::ReportNotFound(name) if name == "Nope"));
}

#[test]
fn unpaired_data_handler_fails_at_build() {
    let result = ReportRegistry::builder()
        .data_handler("Orphan", Arc::new(StubData))
        .build();
    let error = result.err().expect("build must fail");
    assert!(matches!(error, ReportError::PlotHandlerNotFound(id) if id == "Orphan"));
}

#[test]
fn plot_lookup_for_unknown_identifier_is_distinct() {
    let registry = two_report_registry();
    let error = registry.plot_handler("Nope").err().expect("unknown id");
    assert!(matches!(error, ReportError::PlotHandlerNotFound(id) if id == "Nope"));
}
