mod scope;
mod stock;

#[cfg(test)]
mod tests;

pub use scope::ReportScope;
pub use stock::stock_registry;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::ReportCache;
use crate::config::{Config, PlotDefaults};
use crate::dataset::ConsolidatedDataset;
use crate::error::ReportError;
use crate::registry::{HandlerError, ReportData, ReportRegistry};
use crate::render::{
    self, ChartRenderer, PlotOutcome, PlottersRenderer, RenderError,
};
use crate::request::ReportRequest;
use crate::source::DataSource;
use crate::types::MonitoringType;

/// Result of one `generate` call. `report_data` is the retrieved dataset:
/// always present when no plot was requested, otherwise only on request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedReport {
    pub plot: bool,
    pub thumbnail: bool,
    pub report_data: Option<ConsolidatedDataset>,
}

/// Orchestrates one report request: resolve the name, retrieve data
/// through the cache, render the plot through the cache, assemble.
/// Stages run strictly in order and the first failure aborts the call.
pub struct ReportGenerator {
    registry: ReportRegistry,
    monitoring_type: MonitoringType,
    source: Arc<dyn DataSource>,
    renderer: Arc<dyn ChartRenderer>,
    cache: ReportCache,
    plot_dir: PathBuf,
    plot_defaults: PlotDefaults,
}

impl ReportGenerator {
    pub fn new(
        config: &Config,
        monitoring_type: MonitoringType,
        registry: ReportRegistry,
        source: Arc<dyn DataSource>,
    ) -> Self {
        Self::with_renderer(config, monitoring_type, registry, source, Arc::new(PlottersRenderer))
    }

    /// Same as [`new`](Self::new) with a custom rasterization backend.
    pub fn with_renderer(
        config: &Config,
        monitoring_type: MonitoringType,
        registry: ReportRegistry,
        source: Arc<dyn DataSource>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        Self {
            registry,
            monitoring_type,
            source,
            renderer,
            cache: ReportCache::new(),
            plot_dir: PathBuf::from(&config.plot_dir),
            plot_defaults: config.plots.clone(),
        }
    }

    /// Sorted display names of every report this generator can produce.
    pub fn list_reports(&self) -> Vec<String> {
        self.registry.plots_list()
    }

    pub async fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport, ReportError> {
        request.validate()?;
        let report_id = self.registry.resolve(&request.report_name)?;
        let request_hash = request.content_hash();

        log::info!(
            "retrieving data for {}:{}",
            request.type_name,
            report_id
        );
        let data_started = Instant::now();
        let report_data = self
            .retrieve_report_data(request, &report_id, &request_hash)
            .await?;
        let report_secs = data_started.elapsed().as_secs_f64();

        if !request.generate_plot {
            log::info!(
                "report_generated type={} report={} report_secs={:.2} plot_requested=false",
                request.type_name,
                report_id,
                report_secs
            );
            return Ok(GeneratedReport {
                plot: false,
                thumbnail: false,
                report_data: Some(report_data.dataset),
            });
        }

        log::info!("plotting data for {}:{}", request.type_name, report_id);
        let plot_started = Instant::now();
        let outcome = self
            .generate_plot(request, &report_id, &request_hash, &report_data)
            .await?;
        let plot_secs = plot_started.elapsed().as_secs_f64();

        // the ratio is diagnostic only; a zero or non-finite division
        // reports 0 instead
        let mut report_to_plot = if plot_secs > 0.0 {
            report_secs * 100.0 / plot_secs
        } else {
            0.0
        };
        if !report_to_plot.is_finite() {
            report_to_plot = 0.0;
        }
        tracing::info!(
            target: "report",
            type_name = %request.type_name,
            report = %report_id,
            report_secs,
            plot_secs,
            report_to_plot,
            "report_generated"
        );

        let report_data = request
            .options
            .include_report_data
            .then_some(report_data.dataset);
        Ok(GeneratedReport {
            plot: outcome.plot,
            thumbnail: outcome.thumbnail,
            report_data,
        })
    }

    async fn retrieve_report_data(
        &self,
        request: &ReportRequest,
        report_id: &str,
        request_hash: &str,
    ) -> Result<ReportData, ReportError> {
        let registered = self.registry.report(report_id)?;
        let handler = registered.data.clone();
        self.cache
            .report_data(request_hash, || async move {
                let scope =
                    ReportScope::new(self.source.as_ref(), request, &self.monitoring_type);
                handler.retrieve(&scope).await.map_err(|error| match error {
                    HandlerError::Source(source) => ReportError::DataRetrievalFailed {
                        report: report_id.to_string(),
                        source,
                    },
                    HandlerError::Unit(unit) => ReportError::InvalidUnit(unit),
                })
            })
            .await
    }

    async fn generate_plot(
        &self,
        request: &ReportRequest,
        report_id: &str,
        request_hash: &str,
        data: &ReportData,
    ) -> Result<PlotOutcome, ReportError> {
        let plot_handler = self.registry.plot_handler(report_id)?;
        let kind = plot_handler.chart_kind();
        let metadata = plot_handler.metadata(request, data, &self.plot_defaults);

        let file_stem = self.plot_dir.join(request_hash);
        let dataset = data.graph_dataset.clone();
        let options = request.options.clone();
        let renderer = self.renderer.clone();
        let plot_dir = self.plot_dir.clone();

        self.cache
            .rendered_plot(request_hash, || async move {
                let join = tokio::task::spawn_blocking(move || {
                    std::fs::create_dir_all(&plot_dir).map_err(|source| {
                        render::DispatchError::Primary(RenderError::Write {
                            path: plot_dir.display().to_string(),
                            source,
                        })
                    })?;
                    render::plot_dataset(
                        &file_stem,
                        &dataset,
                        metadata,
                        kind,
                        &options,
                        renderer.as_ref(),
                    )
                })
                .await;

                match join {
                    Ok(Ok(outcome)) => Ok(outcome),
                    Ok(Err(render::DispatchError::Primary(source))) => {
                        Err(ReportError::PlotRenderFailed {
                            report: report_id.to_string(),
                            source,
                        })
                    }
                    Ok(Err(render::DispatchError::Thumbnail(source))) => {
                        Err(ReportError::ThumbnailRenderFailed {
                            report: report_id.to_string(),
                            source,
                        })
                    }
                    Err(join_error) => Err(ReportError::PlotRenderFailed {
                        report: report_id.to_string(),
                        source: RenderError::Backend(format!(
                            "render task failed: {}",
                            join_error
                        )),
                    }),
                }
            })
            .await
    }
}
