//! The algorithms that reduce a quality score histogram to a quantization
//! map.
//!
//! A quantizer receives the histogram of empirical qualities, the number of
//! levels requested, and the minimum usable quality score, and returns a map
//! from every raw quality score to its representative value. The map must be
//! the same length as the histogram.
//!
//! Anything implementing [`Quantizer`] can be handed to
//! [`QuantizationInfo`](crate::quantization::QuantizationInfo), including
//! plain functions and closures with the right signature:
//!
//! ```
//! use qualquant::quantizer::{Quantizer, QuantizerError};
//! use qualquant::utils::histogram::Histogram;
//!
//! fn everything_to_twenty(
//!     histogram: &Histogram,
//!     _: usize,
//!     _: u8,
//! ) -> Result<Vec<u8>, QuantizerError> {
//!     Ok(vec![20; histogram.range_len()])
//! }
//!
//! let histogram = Histogram::zero_based_with_capacity(40);
//! let map = everything_to_twenty.quantize(&histogram, 1, 6).unwrap();
//! assert_eq!(map.len(), 41);
//! ```

use std::{error, fmt};

use crate::utils::histogram::Histogram;

pub mod quantile;

pub use quantile::QuantileQuantizer;

//=================//
// Quantizer error //
//=================//

/// An error reported by a [`Quantizer`].
#[derive(Debug, PartialEq, Eq)]
pub enum QuantizerError {
    /// Zero quantization levels were requested.
    NoLevels,

    /// More levels were requested than there are distinct values available to
    /// form them from.
    TooManyLevels {
        /// The number of levels requested.
        requested: usize,

        /// The maximum number of levels that can be formed.
        available: usize,
    },

    /// Any other failure inside the algorithm.
    Failed(String),
}

impl fmt::Display for QuantizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLevels => write!(f, "at least one quantization level is required"),
            Self::TooManyLevels {
                requested,
                available,
            } => write!(
                f,
                "requested {} quantization levels, but only {} are available",
                requested, available
            ),
            Self::Failed(reason) => write!(f, "quantization failed: {}", reason),
        }
    }
}

impl error::Error for QuantizerError {}

//=================//
// Quantizer trait //
//=================//

/// An algorithm that maps every raw quality score onto one of `n_levels`
/// representative values.
pub trait Quantizer {
    /// Computes the quantization map for `histogram`.
    fn quantize(
        &self,
        histogram: &Histogram,
        n_levels: usize,
        min_usable_q_score: u8,
    ) -> Result<Vec<u8>, QuantizerError>;
}

impl<F> Quantizer for F
where
    F: Fn(&Histogram, usize, u8) -> Result<Vec<u8>, QuantizerError>,
{
    fn quantize(
        &self,
        histogram: &Histogram,
        n_levels: usize,
        min_usable_q_score: u8,
    ) -> Result<Vec<u8>, QuantizerError> {
        self(histogram, n_levels, min_usable_q_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closures_are_quantizers() {
        let identity = |histogram: &Histogram, _: usize, _: u8| -> Result<Vec<u8>, QuantizerError> {
            Ok((0..histogram.range_len()).map(|q| q as u8).collect())
        };

        let histogram = Histogram::zero_based_with_capacity(3);
        assert_eq!(identity.quantize(&histogram, 4, 0).unwrap(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            QuantizerError::TooManyLevels {
                requested: 50,
                available: 36
            }
            .to_string(),
            "requested 50 quantization levels, but only 36 are available"
        );
        assert_eq!(
            QuantizerError::NoLevels.to_string(),
            "at least one quantization level is required"
        );
    }
}
