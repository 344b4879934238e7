//! Statistics over raw sample windows
//!
//! Mean and population standard deviation, computed wholesale over a full
//! buffer snapshot once per statistics cycle. Both functions are total over
//! any slice; the empty-slice guard exists only for completeness, since the
//! sample rings have non-zero capacity by construction.
//!
//! The standard deviation uses divisor n (population form), not n-1: each
//! window is treated as the complete population for its cycle, not a sample
//! of a longer recording.

// ============================================================================
// Statistics
// ============================================================================

/// Compute the arithmetic mean of raw samples.
///
/// The sum is accumulated exactly in integer arithmetic before the single
/// floating-point division, so the result is exact for constant windows.
#[must_use]
pub fn mean(samples: &[u16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    (sum as f64 / samples.len() as f64) as f32
}

/// Compute the population standard deviation of raw samples.
///
/// `sqrt(sum((x_i - mean)^2) / n)` with the mean supplied by the caller so
/// one snapshot pass can feed both figures. Squared deviations accumulate in
/// f64 to keep the 12000-element GSR window well inside exact range.
#[must_use]
pub fn population_std_dev(samples: &[u16], mean: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let m = f64::from(mean);
    let sum_sq: f64 = samples
        .iter()
        .map(|&s| {
            let diff = f64::from(s) - m;
            diff * diff
        })
        .sum();

    libm::sqrt(sum_sq / samples.len() as f64) as f32
}

// ============================================================================
// Tests
// ============================================================================
