//! Pipeline tuning knobs.

use std::time::Duration;

/// Page index of the first (and only) round page the pipeline requests.
pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rounds fetched per result summary (a single page).
    pub page_size: u32,
    /// Chart point budget handed to the downsampler.
    pub max_chart_points: usize,
    /// Freshness window for order-scoped resources.
    pub results_ttl: Duration,
    /// Freshness window for the two catalogs.
    pub catalog_ttl: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            max_chart_points: 2000,
            results_ttl: Duration::from_secs(30),
            catalog_ttl: Duration::from_secs(5 * 60),
        }
    }
}
