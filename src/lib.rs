//! Report and plot generation engine for time-bucketed monitoring data.
//!
//! A [`ReportGenerator`] resolves a named report through an immutable
//! [`ReportRegistry`], retrieves bucketed measurements from a [`DataSource`],
//! shapes them (consolidation, gap filling, unit normalization) and renders
//! a chart artifact with an optional thumbnail. Both the retrieved dataset
//! and the rendered plot are memoized by the request's content hash.

mod cache;
mod config;
mod dataset;
mod error;
mod generator;
mod logging;
mod registry;
mod render;
mod request;
mod source;
mod types;
mod units;

pub use cache::ReportCache;
pub use config::{load_config, Config, ConfigError, PlotDefaults};
pub use dataset::{
    fill_with_zero, BucketedDataset, Consolidation, ConsolidatedDataset, SeriesKey,
};
pub use error::ReportError;
pub use generator::{stock_registry, GeneratedReport, ReportGenerator, ReportScope};
pub use logging::init_logging;
pub use registry::{
    DataHandler, HandlerError, PlotHandler, ReportData, ReportRegistry, ReportRegistryBuilder,
};
pub use render::{
    ChartKind, ChartRenderer, PlotMetadata, PlotOutcome, PlottersRenderer, RenderError,
};
pub use request::{ReportOptions, ReportRequest};
pub use source::{BucketQuery, BucketSpan, DataSource, SourceError};
pub use types::{MonitoringType, MonitoringTypeError};
pub use units::{
    find_suitable_rate_unit, find_suitable_unit, UnitSelection, UnitTier, UnknownUnitError,
};
