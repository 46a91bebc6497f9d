//! Pipeline error taxonomy and stage identity.

use core::fmt;

use thiserror::Error;

/// Fetch stages of the dependency graph, in aggregate-error precedence
/// order: when several stages fail in one resolve, the first variant
/// here wins, so repeated retries surface the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    SimTypeCatalog,
    MetricCatalog,
    OrderDetail,
    ResultSummaries,
    RoundPages,
}

impl StageKind {
    pub fn label(self) -> &'static str {
        match self {
            StageKind::SimTypeCatalog => "sim-type catalog",
            StageKind::MetricCatalog => "metric catalog",
            StageKind::OrderDetail => "order detail",
            StageKind::ResultSummaries => "result summaries",
            StageKind::RoundPages => "round pages",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Aggregate error surfaced to the UI layer.
///
/// `InvalidOrderId` is terminal until a new order id is supplied;
/// `Resource` failures admit `retry()`. A valid zero-record outcome is
/// not an error and never appears here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid order id: {raw:?}")]
    InvalidOrderId { raw: String },

    #[error("{stage} fetch failed: {message}")]
    Resource { stage: StageKind, message: String },
}

impl PipelineError {
    pub fn resource(stage: StageKind, err: &rf_client::ClientError) -> Self {
        PipelineError::Resource {
            stage,
            message: err.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Resource { .. })
    }
}
