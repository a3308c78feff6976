//! A single cell of a recalibration table.

use serde::{Deserialize, Serialize};

/// Pseudocount added to both mismatches and matches when estimating the
/// empirical error rate, so that a datum with no mismatches does not claim
/// an infinite quality.
const SMOOTHING_CONSTANT: f64 = 1.0;

/// Observation and mismatch counts for one recalibration table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecalDatum {
    /// The number of bases observed.
    pub num_observations: u64,

    /// The number of observed bases that were mismatches. Fractional because
    /// upstream engines may weight mismatches.
    pub num_mismatches: f64,
}

impl RecalDatum {
    /// Creates a new [`RecalDatum`].
    pub fn new(num_observations: u64, num_mismatches: f64) -> Self {
        Self {
            num_observations,
            num_mismatches,
        }
    }

    /// Adds the counts of another datum to this one. Returns `None` if the
    /// observation count would overflow.
    pub fn checked_combine(&self, other: &RecalDatum) -> Option<RecalDatum> {
        Some(Self {
            num_observations: self.num_observations.checked_add(other.num_observations)?,
            num_mismatches: self.num_mismatches + other.num_mismatches,
        })
    }

    /// The smoothed, Phred-scaled empirical quality of this datum, capped at
    /// `cap`.
    ///
    /// ```
    /// use qualquant::recal::RecalDatum;
    ///
    /// // (9 + 1) / (998 + 2) = 0.01 => Q20
    /// let datum = RecalDatum::new(998, 9.0);
    /// assert!((datum.empirical_quality(40) - 20.0).abs() < 1e-9);
    ///
    /// // No mismatches at all is still capped.
    /// let datum = RecalDatum::new(1_000_000_000, 0.0);
    /// assert_eq!(datum.empirical_quality(40), 40.0);
    /// ```
    pub fn empirical_quality(&self, cap: u8) -> f64 {
        let mismatches = self.num_mismatches + SMOOTHING_CONSTANT;
        let observations = self.num_observations as f64 + 2.0 * SMOOTHING_CONSTANT;
        let quality = -10.0 * (mismatches / observations).log10();
        quality.min(cap as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_accumulates_counts() {
        let datum = RecalDatum::new(100, 1.0)
            .checked_combine(&RecalDatum::new(50, 2.5))
            .unwrap();
        assert_eq!(datum.num_observations, 150);
        assert_eq!(datum.num_mismatches, 3.5);
    }

    #[test]
    fn test_combine_rejects_overflowing_observations() {
        let datum = RecalDatum::new(u64::MAX, 0.0);
        assert!(datum.checked_combine(&RecalDatum::new(1, 0.0)).is_none());
        assert!(datum.checked_combine(&RecalDatum::new(0, 3.0)).is_some());
    }

    #[test]
    fn test_empty_datum_has_quality_of_three() {
        // (0 + 1) / (0 + 2) = 0.5 => ~Q3
        let datum = RecalDatum::default();
        assert!((datum.empirical_quality(40) - 3.0103).abs() < 1e-4);
    }
}
