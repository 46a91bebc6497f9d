use crate::CoreError;

/// Floating point type used throughout the pipeline.
pub type Real = f64;

/// Round to two decimal places, half away from zero.
pub fn round2(v: Real) -> Real {
    (v * 100.0).round() / 100.0
}

/// `Some(v)` if `v` is finite, `None` for NaN and infinities.
pub fn finite_or_none(v: Real) -> Option<Real> {
    v.is_finite().then_some(v)
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Parse a raw filter bound as typed by the user.
///
/// Empty and unparsable input both mean "unbounded"; the caller supplies
/// the matching infinity.
pub fn parse_bound(raw: &str, unbounded: Real) -> Real {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return unbounded;
    }
    trimmed.parse().unwrap_or(unbounded)
}
