//! rf-pipeline: results aggregation for simulation orders.
//!
//! Given an order id, resolves the dependent remote resources (catalogs,
//! order detail, per-type result summaries, round pages), joins them
//! into uniform records, filters, downsamples for charting, and computes
//! per-group averages, coordinating partial failure and retry across
//! the whole fetch graph.

pub mod aggregate;
pub mod config;
pub mod downsample;
pub mod error;
pub mod filter;
pub mod join;
pub mod resolver;
pub mod session;
pub mod stage;

pub use aggregate::group_averages;
pub use config::{FIRST_PAGE, PipelineConfig};
pub use downsample::downsample;
pub use error::{PipelineError, PipelineResult, StageKind};
pub use filter::{FilterBounds, FilterCriteria, apply_filter};
pub use join::join_rounds;
pub use resolver::{DependencyResolver, ResolvedGraph, RoundFetchFailure, RoundsBundle, RoundsKey};
pub use session::{MetricOption, ResultsSession, ResultsSnapshot};
pub use stage::{PipelineState, StageState};
