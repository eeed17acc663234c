use thiserror::Error;

use crate::render::RenderError;
use crate::source::SourceError;
use crate::units::UnknownUnitError;

/// Failure taxonomy for report generation, one variant per failing stage.
///
/// Every stage returns success-or-error explicitly; the generator never
/// continues past a failed stage and never retries internally.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report {0} is not defined")]
    ReportNotFound(String),
    #[error("plot handler for report {0} is not defined")]
    PlotHandlerNotFound(String),
    #[error("invalid report request: {0}")]
    InvalidRequest(String),
    #[error("data retrieval for report {report} failed: {source}")]
    DataRetrievalFailed { report: String, source: SourceError },
    #[error("plot rendering for report {report} failed: {source}")]
    PlotRenderFailed { report: String, source: RenderError },
    #[error("thumbnail rendering for report {report} failed: {source}")]
    ThumbnailRenderFailed { report: String, source: RenderError },
    #[error(transparent)]
    InvalidUnit(#[from] UnknownUnitError),
}
