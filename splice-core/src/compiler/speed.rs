//! Decomposition of a playback speed into valid `atempo` stages.

use crate::config::{ATEMPO_MAX, ATEMPO_MIN, SPEED_EPSILON};
use crate::graph::Filter;

/// True when `speed` is close enough to 1.0 to skip retiming entirely.
#[must_use]
pub fn is_unity(speed: f64) -> bool {
    (speed - 1.0).abs() < SPEED_EPSILON
}

/// Splits `speed` into stage factors whose product is `speed`.
///
/// Factors of 0.5 are extracted while the remainder is below 0.5, factors of
/// 2.0 while it is above 2.0, and the residual is appended last. A unity
/// speed yields no stages.
#[must_use]
pub fn speed_ratio_chain(speed: f64) -> Vec<f64> {
    if is_unity(speed) {
        return Vec::new();
    }

    let mut stages = Vec::new();
    let mut remaining = speed;
    while remaining < ATEMPO_MIN {
        stages.push(ATEMPO_MIN);
        remaining /= ATEMPO_MIN;
    }
    while remaining > ATEMPO_MAX {
        stages.push(ATEMPO_MAX);
        remaining /= ATEMPO_MAX;
    }
    stages.push(remaining);
    stages
}

/// The `atempo` filters realizing `speed`.
#[must_use]
pub fn atempo_filters(speed: f64) -> Vec<Filter> {
    speed_ratio_chain(speed)
        .into_iter()
        .map(Filter::ATempo)
        .collect()
}
