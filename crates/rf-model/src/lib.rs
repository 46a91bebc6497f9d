//! rf-model: wire and derived data types for the results pipeline.

pub mod catalog;
pub mod derived;
pub mod order;
pub mod results;

pub use catalog::{MetricDef, SimTypeDef};
pub use derived::{ChartPoint, GroupAverage, ResultRecord};
pub use order::Order;
pub use results::{RoundPage, RoundRecord, RoundsGroup, Scalar, SimTypeResultSummary};
