//! rf-core: stable foundation for resultflow.
//!
//! Contains:
//! - ids (typed backend-issued identifiers)
//! - numeric (Real + rounding + raw-input parsing)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
