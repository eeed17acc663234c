use std::path::Path;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use tempfile::TempDir;

use super::{stock_registry, ReportGenerator};
use crate::config::Config;
use crate::dataset::BucketedDataset;
use crate::error::ReportError;
use crate::render::{ChartKind, ChartRenderer, PlotMetadata, RenderError};
use crate::request::{ReportOptions, ReportRequest};
use crate::source::{BucketQuery, BucketSpan, DataSource, SourceError};
use crate::types::MonitoringType;

const GRANULARITY_SECS: i64 = 600;

struct StubSource {
    dataset: BucketedDataset,
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
}

impl StubSource {
    fn with_dataset(dataset: BucketedDataset) -> Self {
        Self {
            dataset,
            calls: AtomicUsize::new(0),
            delay: None,
            fail: false,
        }
    }

    fn empty() -> Self {
        Self::with_dataset(BucketedDataset::new())
    }

    fn slow(dataset: BucketedDataset, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::with_dataset(dataset)
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for StubSource {
    fn determine_bucket_size(
        &self,
        _start: chrono::DateTime<Utc>,
        _end: chrono::DateTime<Utc>,
    ) -> Result<BucketSpan, SourceError> {
        Ok(BucketSpan {
            interval_secs: GRANULARITY_SECS,
            granularity_secs: GRANULARITY_SECS,
        })
    }

    async fn retrieve_bucketed_data(
        &self,
        _query: &BucketQuery,
    ) -> Result<BucketedDataset, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(SourceError::new("store unavailable"));
        }
        Ok(self.dataset.clone())
    }
}

struct RecordingRenderer {
    calls: Mutex<Vec<(ChartKind, PlotMetadata)>>,
    fail_at: Option<usize>,
}

impl RecordingRenderer {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_at: None,
        }
    }

    fn failing_at(call_index: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_at: Some(call_index),
        }
    }

    fn calls(&self) -> Vec<(ChartKind, PlotMetadata)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(
        &self,
        kind: ChartKind,
        _path: &Path,
        _dataset: &crate::dataset::ConsolidatedDataset,
        metadata: &PlotMetadata,
    ) -> Result<(), RenderError> {
        let mut calls = self.calls.lock().expect("calls lock");
        let index = calls.len();
        calls.push((kind, metadata.clone()));
        if self.fail_at == Some(index) {
            return Err(RenderError::Backend("injected failure".to_string()));
        }
        Ok(())
    }
}

struct Harness {
    generator: Arc<ReportGenerator>,
    source: Arc<StubSource>,
    renderer: Arc<RecordingRenderer>,
    _plot_dir: TempDir,
}

fn harness(source: StubSource, renderer: RecordingRenderer, quantity: &'static str) -> Harness {
    let plot_dir = TempDir::new().expect("temp plot dir");
    let config = Config {
        plot_dir: plot_dir.path().display().to_string(),
        ..Config::default()
    };
    let monitoring_type = MonitoringType::new(
        "JobActivity",
        vec!["Site".to_string(), "Status".to_string()],
        vec!["Value".to_string()],
    )
    .expect("valid monitoring type");
    let registry = stock_registry(quantity).expect("stock registry builds");
    let source = Arc::new(source);
    let renderer = Arc::new(renderer);
    let generator = Arc::new(ReportGenerator::with_renderer(
        &config,
        monitoring_type,
        registry,
        source.clone(),
        renderer.clone(),
    ));
    Harness {
        generator,
        source,
        renderer,
        _plot_dir: plot_dir,
    }
}

fn two_hour_request(report_name: &str, generate_plot: bool) -> ReportRequest {
    let start = Utc.timestamp_opt(0, 0).single().expect("valid epoch");
    ReportRequest {
        type_name: "JobActivity".to_string(),
        report_name: report_name.to_string(),
        start_time: start,
        end_time: start + ChronoDuration::hours(2),
        grouping: vec!["Site".to_string()],
        key_filters: Default::default(),
        options: ReportOptions::default(),
        generate_plot,
    }
}

fn job_buckets() -> BucketedDataset {
    let mut dataset = BucketedDataset::new();
    dataset.insert("site-a", 0, vec![10.0, 2.0]);
    dataset.insert("site-a", 600, vec![30.0, 3.0]);
    dataset.insert("site-b", 0, vec![8.0, 2.0]);
    dataset
}

#[tokio::test]
async fn lists_stock_reports_sorted_by_display_name() {
    let harness = harness(StubSource::empty(), RecordingRenderer::new(), "jobs");
    assert_eq!(
        harness.generator.list_reports(),
        vec!["Average Value", "Cumulative Value", "Eff", "Total Value"]
    );
}

#[tokio::test]
async fn eff_over_empty_window_plots_no_data_placeholder() {
    let harness = harness(StubSource::empty(), RecordingRenderer::new(), "jobs");
    let request = two_hour_request("Eff", true);

    let report = harness
        .generator
        .generate(&request)
        .await
        .expect("generation succeeds");

    assert!(report.plot);
    assert!(!report.thumbnail);
    assert!(report.report_data.is_none());
    let calls = harness.renderer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ChartKind::NoData);
}

#[tokio::test]
async fn data_only_request_returns_the_dataset() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::new(),
        "jobs",
    );
    let request = two_hour_request("Average Value", false);

    let report = harness
        .generator
        .generate(&request)
        .await
        .expect("generation succeeds");

    assert!(!report.plot);
    assert!(!report.thumbnail);
    let dataset = report.report_data.expect("dataset attached");
    // average consolidation at base "jobs" scale, gap-filled to 12 buckets
    assert_eq!(dataset.get("site-a", 0), Some(5.0));
    assert_eq!(dataset.get("site-a", 600), Some(10.0));
    assert_eq!(dataset.get("site-a", 1_200), Some(0.0));
    assert_eq!(dataset.bucket_count("site-a"), 12);
    assert_eq!(dataset.bucket_count("site-b"), 12);
    assert!(harness.renderer.calls().is_empty());
}

#[tokio::test]
async fn plot_with_report_data_attaches_dataset_on_request() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::new(),
        "jobs",
    );
    let mut request = two_hour_request("Average Value", true);
    request.options.include_report_data = true;

    let report = harness
        .generator
        .generate(&request)
        .await
        .expect("generation succeeds");

    assert!(report.plot);
    assert!(report.report_data.is_some());
    let calls = harness.renderer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ChartKind::StackedLine);
    assert_eq!(calls[0].1.ylabel.as_deref(), Some("jobs"));
    assert_eq!(calls[0].1.span_secs, Some(GRANULARITY_SECS));
}

#[tokio::test]
async fn unknown_report_name_is_report_not_found() {
    let harness = harness(StubSource::empty(), RecordingRenderer::new(), "jobs");
    let request = two_hour_request("Nope", true);

    let error = harness
        .generator
        .generate(&request)
        .await
        .expect_err("unknown report");
    assert!(matches!(error, ReportError::ReportNotFound(name) if name == "Nope"));
    assert_eq!(harness.source.call_count(), 0);
}

#[tokio::test]
async fn invalid_time_range_aborts_before_any_stage() {
    let harness = harness(StubSource::empty(), RecordingRenderer::new(), "jobs");
    let mut request = two_hour_request("Eff", true);
    request.end_time = request.start_time;

    let error = harness
        .generator
        .generate(&request)
        .await
        .expect_err("invalid range");
    assert!(matches!(error, ReportError::InvalidRequest(_)));
    assert_eq!(harness.source.call_count(), 0);
}

#[tokio::test]
async fn source_failure_maps_to_data_retrieval_failed() {
    let harness = harness(StubSource::failing(), RecordingRenderer::new(), "jobs");
    let request = two_hour_request("Eff", true);

    let error = harness
        .generator
        .generate(&request)
        .await
        .expect_err("source fails");
    assert!(matches!(
        error,
        ReportError::DataRetrievalFailed { report, .. } if report == "Eff"
    ));
    assert!(harness.renderer.calls().is_empty());
}

#[tokio::test]
async fn unknown_quantity_maps_to_invalid_unit() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::new(),
        "zorkmids",
    );
    let request = two_hour_request("Average Value", false);

    let error = harness
        .generator
        .generate(&request)
        .await
        .expect_err("unknown unit family");
    assert!(matches!(error, ReportError::InvalidUnit(_)));
}

#[tokio::test]
async fn repeated_request_hits_the_data_cache() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::new(),
        "jobs",
    );
    let request = two_hour_request("Total Value", false);

    for _ in 0..3 {
        harness
            .generator
            .generate(&request)
            .await
            .expect("generation succeeds");
    }

    assert_eq!(harness.source.call_count(), 1);
}

#[tokio::test]
async fn repeated_plot_request_hits_the_plot_cache() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::new(),
        "jobs",
    );
    let request = two_hour_request("Total Value", true);

    for _ in 0..3 {
        harness
            .generator
            .generate(&request)
            .await
            .expect("generation succeeds");
    }

    assert_eq!(harness.source.call_count(), 1);
    assert_eq!(harness.renderer.calls().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_requests_invoke_the_source_once() {
    let harness = harness(
        StubSource::slow(job_buckets(), Duration::from_millis(50)),
        RecordingRenderer::new(),
        "jobs",
    );
    let request = two_hour_request("Total Value", false);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let generator = harness.generator.clone();
        let request = request.clone();
        handles.push(tokio::spawn(async move {
            generator.generate(&request).await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("task joins")
            .expect("generation succeeds");
    }

    assert_eq!(harness.source.call_count(), 1);
}

#[tokio::test]
async fn clamps_width_and_defaults_thumbnail_dimensions() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::new(),
        "jobs",
    );
    let mut request = two_hour_request("Total Value", true);
    request.options.thumbnail = true;
    request.options.width = Some(5000);

    let report = harness
        .generator
        .generate(&request)
        .await
        .expect("generation succeeds");

    assert!(report.plot);
    assert!(report.thumbnail);
    let calls = harness.renderer.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1.width, 1600);
    assert_eq!(calls[1].1.width, 200);
    assert_eq!(calls[1].1.height, 125);
}

#[tokio::test]
async fn primary_render_failure_maps_to_plot_render_failed() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::failing_at(0),
        "jobs",
    );
    let request = two_hour_request("Total Value", true);

    let error = harness
        .generator
        .generate(&request)
        .await
        .expect_err("render fails");
    assert!(matches!(
        error,
        ReportError::PlotRenderFailed { report, .. } if report == "Total"
    ));
}

#[tokio::test]
async fn thumbnail_failure_maps_to_thumbnail_render_failed() {
    let harness = harness(
        StubSource::with_dataset(job_buckets()),
        RecordingRenderer::failing_at(1),
        "jobs",
    );
    let mut request = two_hour_request("Total Value", true);
    request.options.thumbnail = true;

    let error = harness
        .generator
        .generate(&request)
        .await
        .expect_err("thumbnail fails");
    assert!(matches!(
        error,
        ReportError::ThumbnailRenderFailed { report, .. } if report == "Total"
    ));
    // the primary render did run before the failure
    assert_eq!(harness.renderer.calls().len(), 2);
}
