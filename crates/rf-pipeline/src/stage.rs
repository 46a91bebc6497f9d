//! Tri-state stage tracking and the per-run pipeline state machine.

use crate::error::PipelineError;

/// Lifecycle of a single fetch stage.
///
/// `Idle` covers stages whose enablement predicate is currently false
/// (no order id supplied, no summary selected); a disabled stage is not
/// an error and does not block the rest of the graph.
#[derive(Debug, Clone)]
pub enum StageState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(PipelineError),
}

impl<T> StageState<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            StageState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            StageState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, StageState::Loading)
    }
}

impl<T> Default for StageState<T> {
    fn default() -> Self {
        StageState::Idle
    }
}

/// Pipeline run state, keyed by the current order id.
///
/// `Invalid` is terminal until a new order id is supplied; `Ready` and
/// `PartialError` both admit `retry()`, which moves back through
/// `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Loading,
    Ready,
    PartialError,
    Invalid,
}
