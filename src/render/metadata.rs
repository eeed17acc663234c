use crate::config::PlotDefaults;
use crate::request::ReportOptions;

pub const MIN_PLOT_DIMENSION: u32 = 200;
pub const MAX_PLOT_DIMENSION: u32 = 1600;

const DEFAULT_THUMB_WIDTH: u32 = 200;
const DEFAULT_THUMB_HEIGHT: u32 = 125;
const THUMB_PADDING: u32 = 20;

/// Rendering metadata for one chart. Handlers supply the defaults, the
/// dispatcher applies per-request overrides before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotMetadata {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub legend: bool,
    /// Bucket width, used by bar-style renderers.
    pub span_secs: Option<i64>,
}

impl PlotMetadata {
    pub fn from_defaults(defaults: &PlotDefaults) -> Self {
        Self {
            width: defaults.width,
            height: defaults.height,
            padding: defaults.padding,
            title: None,
            xlabel: None,
            ylabel: None,
            legend: defaults.legend,
            span_secs: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_ylabel(mut self, ylabel: impl Into<String>) -> Self {
        self.ylabel = Some(ylabel.into());
        self
    }

    pub fn with_xlabel(mut self, xlabel: impl Into<String>) -> Self {
        self.xlabel = Some(xlabel.into());
        self
    }

    pub fn with_span_secs(mut self, span_secs: i64) -> Self {
        self.span_secs = Some(span_secs);
        self
    }

    /// Clamp overridden dimensions into the supported range and apply the
    /// request's title override.
    pub(crate) fn apply_request_overrides(&mut self, options: &ReportOptions) {
        if let Some(width) = options.width {
            self.width = width.clamp(MIN_PLOT_DIMENSION, MAX_PLOT_DIMENSION);
        }
        if let Some(height) = options.height {
            self.height = height.clamp(MIN_PLOT_DIMENSION, MAX_PLOT_DIMENSION);
        }
        if let Some(title) = &options.plot_title {
            self.title = Some(title.clone());
        }
    }

    /// Thumbnail variant: decoration stripped, overridden or default
    /// dimensions, fixed small padding. `None` when no thumbnail was
    /// requested.
    pub(crate) fn thumbnail_variant(&self, options: &ReportOptions) -> Option<PlotMetadata> {
        if !options.thumbnail {
            return None;
        }
        let mut thumb = self.clone();
        thumb.legend = false;
        thumb.title = None;
        thumb.xlabel = None;
        thumb.ylabel = None;
        thumb.width = options.thumb_width.unwrap_or(DEFAULT_THUMB_WIDTH);
        thumb.height = options.thumb_height.unwrap_or(DEFAULT_THUMB_HEIGHT);
        thumb.padding = THUMB_PADDING;
        Some(thumb)
    }
}
