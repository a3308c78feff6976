//! Histogram of observation counts indexed by quality score.
//!
//! # Overview
//!
//! [Histograms] partition data into consecutive, non-overlapping bins. Here,
//! the bins are discrete quality scores, so the histogram follows two rules:
//!
//! 1. Only discrete numbers are considered as bins. In other words, bins
//!    represent values in the range of `[0, 1, 2, 3, ..., n]`.
//! 2. The range always starts at zero and ends at the capacity specified in
//!    the constructor (inclusive). A histogram over quality scores `0..=40`
//!    therefore has 41 bins.
//!
//! # Usage
//!
//! Create an empty histogram with
//! [`zero_based_with_capacity`][Histogram::zero_based_with_capacity], or
//! adopt counts you already have with [`from_values`][Histogram::from_values].
//! Bins are incremented with [`increment`][Histogram::increment] (a `+= 1`)
//! or [`increment_by`][Histogram::increment_by].
//!
//! ```
//! use qualquant::utils::histogram::Histogram;
//! let mut hist = Histogram::zero_based_with_capacity(40);
//!
//! hist.increment_by(10, 100).unwrap();
//! hist.increment_by(10, 50).unwrap();
//! hist.increment(20).unwrap();
//!
//! assert_eq!(hist.get(10), 150);
//! assert_eq!(hist.get(20), 1);
//! assert_eq!(hist.sum(), 151);
//! assert_eq!(hist.range_len(), 41);
//! ```
//!
//! Incrementing a bin that falls outside the range of the [`Histogram`] is
//! an error rather than a silent no-op:
//!
//! ```
//! use qualquant::utils::histogram::Histogram;
//! use qualquant::utils::histogram::HistogramError;
//! let mut hist = Histogram::zero_based_with_capacity(40);
//!
//! let result = hist.increment(41);
//! assert_eq!(result.unwrap_err(), HistogramError::BinOutOfBounds(41));
//!
//! // Counts never wrap around, either.
//! hist.increment_by(30, u64::MAX).unwrap();
//! let result = hist.increment(30);
//! assert_eq!(result.unwrap_err(), HistogramError::CountOverflow(30));
//! assert_eq!(hist.get(30), u64::MAX);
//! ```
//!
//! [Histograms]: https://en.wikipedia.org/wiki/Histogram

use std::{error, fmt};

use serde::{Deserialize, Serialize};

/// Histogram of observation counts over a zero-based, discrete range. For
/// more in depth information, please see the [module-level documentation].
///
/// Serializes as a plain list of counts. The range is always derived from
/// the number of counts, so a deserialized histogram cannot disagree with
/// itself.
///
/// [module-level documentation]: self
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct Histogram {
    // Vec-backed value store for the histogram.
    values: Vec<u64>,
    // Ending range for the histogram (inclusive).
    range_stop: usize,
}

/// An error that occurs while building or updating a [`Histogram`].
#[derive(Debug, PartialEq, Eq)]
pub enum HistogramError {
    /// The bin is out-of-bounds for the histogram. Holds the offending bin.
    BinOutOfBounds(usize),

    /// Incrementing the bin would overflow its count. Holds the offending bin.
    CountOverflow(usize),

    /// A histogram was built from zero counts.
    Empty,
}

impl fmt::Display for HistogramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinOutOfBounds(bin) => write!(f, "histogram bin out of bounds: {}", bin),
            Self::CountOverflow(bin) => write!(f, "histogram bin count overflowed: {}", bin),
            Self::Empty => write!(f, "a histogram needs at least one bin"),
        }
    }
}

impl error::Error for HistogramError {}

impl Histogram {
    //=================//
    // Initializations //
    //=================//

    /// Creates a zero-based histogram with a given capacity.
    pub fn zero_based_with_capacity(capacity: usize) -> Self {
        Self {
            values: vec![0; capacity + 1],
            range_stop: capacity,
        }
    }

    /// Creates a zero-based histogram from pre-computed counts. Fails if no
    /// counts are given, as a histogram always has at least the zero bin.
    pub fn from_values(values: Vec<u64>) -> Result<Self, HistogramError> {
        let range_stop = values.len().checked_sub(1).ok_or(HistogramError::Empty)?;
        Ok(Self { values, range_stop })
    }

    //=================================//
    // Getting and incrementing values //
    //=================================//

    /// Increments a particular bin in the histogram by one.
    pub fn increment(&mut self, bin: usize) -> Result<(), HistogramError> {
        self.increment_by(bin, 1)
    }

    /// Increments a particular bin in the histogram by the specified value.
    /// The bin is left untouched if the increment would overflow it.
    pub fn increment_by(&mut self, bin: usize, value: u64) -> Result<(), HistogramError> {
        let count = self
            .values
            .get_mut(bin)
            .ok_or(HistogramError::BinOutOfBounds(bin))?;

        *count = count
            .checked_add(value)
            .ok_or(HistogramError::CountOverflow(bin))?;
        Ok(())
    }

    /// Gets a value for a bin within a histogram.
    ///
    /// # Panics
    ///
    /// Panics if the bin is out of range.
    pub fn get(&self, bin: usize) -> u64 {
        *self.values.get(bin).unwrap_or_else(|| {
            panic!(
                "Could not lookup value for quality score histogram bin: {}.",
                bin
            )
        })
    }

    /// Simply returns the values in the distribution by ref.
    pub fn values(&self) -> &[u64] {
        self.values.as_ref()
    }

    //=======//
    // Range //
    //=======//

    /// Gives the number of bins in the histogram.
    pub fn range_len(&self) -> usize {
        self.range_stop + 1
    }

    /// Gives the stopping position for the range of the histogram.
    pub fn range_stop(&self) -> usize {
        self.range_stop
    }

    //========================//
    // Numerical computations //
    //========================//

    /// Computes the sum of the values within the distribution. Widened to
    /// `u128` so that bins full of `u64::MAX` counts still add up.
    pub fn sum(&self) -> u128 {
        self.values.iter().map(|count| *count as u128).sum()
    }

    /// Computes the sum of the values from `start` to `stop` (both inclusive).
    pub fn sum_within(&self, start: usize, stop: usize) -> u128 {
        (start..=stop).map(|bin| self.get(bin) as u128).sum()
    }

    /// Computes the count-weighted mean bin from `start` to `stop` (both
    /// inclusive). Returns `None` if there are no observations in that range.
    pub fn mean_within(&self, start: usize, stop: usize) -> Option<f64> {
        let mut sum = 0.0;
        let mut denominator = 0.0;

        for i in start..=stop {
            let bin_value = self.get(i) as f64;
            denominator += bin_value;
            sum += bin_value * i as f64;
        }

        if denominator == 0.0 {
            return None;
        }

        Some(sum / denominator)
    }
}

impl TryFrom<Vec<u64>> for Histogram {
    type Error = HistogramError;

    fn try_from(values: Vec<u64>) -> Result<Self, Self::Error> {
        Self::from_values(values)
    }
}

impl From<Histogram> for Vec<u64> {
    fn from(histogram: Histogram) -> Self {
        histogram.values
    }
}
