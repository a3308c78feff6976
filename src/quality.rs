//! Bounds on the quality scores handled during quantization.

use serde::{Deserialize, Serialize};

/// Highest quality score considered during quantization (inclusive).
pub const MAX_QUAL_SCORE: u8 = 40;

/// Lowest quality score that is considered usable by a quantizer. Anything
/// below this is treated as noise.
pub const MIN_USABLE_Q_SCORE: u8 = 6;

/// The quality score bounds that a quantization is computed within.
///
/// These are passed around explicitly rather than read from a global so that
/// alternate bounds (e.g., for a toy histogram in a test) are easy to use.
///
/// ```
/// use qualquant::quality::QualityBounds;
///
/// let bounds = QualityBounds::default();
/// assert_eq!(bounds.max_qual_score(), 40);
/// assert_eq!(bounds.min_usable_q_score(), 6);
/// assert_eq!(bounds.len(), 41);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct QualityBounds {
    /// Inclusive upper bound on quality scores.
    max_qual_score: u8,

    /// Floor handed to the quantizer.
    min_usable_q_score: u8,
}

impl QualityBounds {
    /// Creates a new [`QualityBounds`].
    pub fn new(max_qual_score: u8, min_usable_q_score: u8) -> Self {
        Self {
            max_qual_score,
            min_usable_q_score,
        }
    }

    /// Gets the inclusive upper bound on quality scores.
    pub fn max_qual_score(&self) -> u8 {
        self.max_qual_score
    }

    /// Gets the minimum usable quality score.
    pub fn min_usable_q_score(&self) -> u8 {
        self.min_usable_q_score
    }

    /// The number of distinct quality scores, i.e., `max_qual_score + 1`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.max_qual_score as usize + 1
    }

    /// Indicates whether a quality score falls within `0..=max_qual_score`.
    ///
    /// ```
    /// use qualquant::quality::QualityBounds;
    ///
    /// let bounds = QualityBounds::default();
    /// assert!(bounds.contains(40));
    /// assert!(!bounds.contains(41));
    /// ```
    pub fn contains(&self, qual: usize) -> bool {
        qual <= self.max_qual_score as usize
    }
}

impl Default for QualityBounds {
    fn default() -> Self {
        Self::new(MAX_QUAL_SCORE, MIN_USABLE_Q_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_bounds() {
        let bounds = QualityBounds::new(6, 2);
        assert_eq!(bounds.len(), 7);
        assert!(bounds.contains(0));
        assert!(bounds.contains(6));
        assert!(!bounds.contains(7));
    }
}
