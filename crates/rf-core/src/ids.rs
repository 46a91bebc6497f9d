use core::fmt;

use crate::error::{CoreError, CoreResult};

/// Backend-issued identifier used across the pipeline.
///
/// - plain `i64` because the wire format carries JSON numbers
/// - `0` is never a live id; input that parses to `0` is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RemoteId(i64);

impl RemoteId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Parse an id from raw route or form input.
    ///
    /// Empty, non-numeric, and zero input are all rejected; the caller
    /// decides whether that is an error or just "nothing selected".
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidId {
            raw: raw.to_string(),
        };
        let value: i64 = raw.trim().parse().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }
        Ok(Self(value))
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RemoteId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type OrderId = RemoteId;
pub type SimTypeId = RemoteId;
pub type MetricId = RemoteId;
pub type SummaryId = RemoteId;
