mod charts;
mod metadata;


pub use charts::PlottersRenderer;
pub use metadata::{PlotMetadata, MAX_PLOT_DIMENSION, MIN_PLOT_DIMENSION};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dataset::ConsolidatedDataset;
use crate::request::ReportOptions;

/// Chart families the engine dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    StackedBar,
    StackedLine,
    Cumulative,
    Pie,
    Quality,
    /// Placeholder drawn when the dataset has nothing to show.
    NoData,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart backend error: {0}")]
    Backend(String),
    #[error("failed to encode plot image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to write plot artifact {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Low-level rasterization, one implementation arm per chart kind.
pub trait ChartRenderer: Send + Sync {
    fn render(
        &self,
        kind: ChartKind,
        path: &Path,
        dataset: &ConsolidatedDataset,
        metadata: &PlotMetadata,
    ) -> Result<(), RenderError>;
}

/// Whether a plot and/or a thumbnail were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOutcome {
    pub plot: bool,
    pub thumbnail: bool,
}

/// Which of the two renders failed; the generator maps this onto its
/// error taxonomy.
#[derive(Debug, Error)]
pub(crate) enum DispatchError {
    #[error(transparent)]
    Primary(RenderError),
    #[error(transparent)]
    Thumbnail(RenderError),
}

/// Render `dataset` to `<file_stem>.png`, substituting the no-data
/// placeholder for an empty dataset, plus an optional `<file_stem>.thb.png`
/// thumbnail. A primary failure propagates before any thumbnail attempt; a
/// thumbnail failure fails the call but the primary artifact stays on disk.
pub(crate) fn plot_dataset(
    file_stem: &Path,
    dataset: &ConsolidatedDataset,
    mut metadata: PlotMetadata,
    kind: ChartKind,
    options: &ReportOptions,
    renderer: &dyn ChartRenderer,
) -> Result<PlotOutcome, DispatchError> {
    metadata.apply_request_overrides(options);
    let kind = if dataset.is_empty() {
        ChartKind::NoData
    } else {
        kind
    };

    let plot_path = artifact_path(file_stem, "png");
    renderer
        .render(kind, &plot_path, dataset, &metadata)
        .map_err(DispatchError::Primary)?;

    let Some(thumb_metadata) = metadata.thumbnail_variant(options) else {
        return Ok(PlotOutcome {
            plot: true,
            thumbnail: false,
        });
    };

    let thumb_path = artifact_path(file_stem, "thb.png");
    renderer
        .render(kind, &thumb_path, dataset, &thumb_metadata)
        .map_err(DispatchError::Thumbnail)?;
    Ok(PlotOutcome {
        plot: true,
        thumbnail: true,
    })
}

fn artifact_path(file_stem: &Path, extension: &str) -> PathBuf {
    let mut path = file_stem.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
