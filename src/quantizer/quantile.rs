//! A simple quantizer that splits the quality range by observation mass.

use tracing::debug;

use super::{Quantizer, QuantizerError};
use crate::utils::histogram::Histogram;

/// Quantizer that partitions the quality range into contiguous intervals
/// holding roughly equal numbers of observations.
///
/// This makes no attempt to minimise the error introduced by quantization; it
/// is a deterministic, easy to reason about baseline. The rules are:
///
/// 1. Quality scores below the minimum usable quality score are collapsed into
///    a single leading interval, provided more than one level is requested.
/// 2. The rest of the range is split into the remaining number of intervals by
///    walking the cumulative observation count. When there are no
///    observations at all, every bin is weighted equally.
/// 3. Each interval maps to its observation-weighted mean quality score,
///    rounded (or to its midpoint, if the interval saw no observations).
///
/// Because every interval's representative lies inside that interval, the map
/// always has exactly `n_levels` runs.
///
/// ```
/// use qualquant::quantizer::{QuantileQuantizer, Quantizer};
/// use qualquant::utils::histogram::Histogram;
///
/// let mut histogram = Histogram::zero_based_with_capacity(9);
/// histogram.increment_by(2, 10).unwrap();
/// histogram.increment_by(7, 10).unwrap();
///
/// let map = QuantileQuantizer.quantize(&histogram, 2, 0).unwrap();
/// assert_eq!(map, [2, 2, 2, 7, 7, 7, 7, 7, 7, 7]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct QuantileQuantizer;

impl Quantizer for QuantileQuantizer {
    fn quantize(
        &self,
        histogram: &Histogram,
        n_levels: usize,
        min_usable_q_score: u8,
    ) -> Result<Vec<u8>, QuantizerError> {
        if n_levels == 0 {
            return Err(QuantizerError::NoLevels);
        }

        let range_len = histogram.range_len();
        let stop = histogram.range_stop();
        let floor = min_usable_q_score as usize;

        let intervals = if n_levels > 1 && floor > 0 && floor < range_len {
            let available = 1 + range_len - floor;
            if n_levels > available {
                return Err(QuantizerError::TooManyLevels {
                    requested: n_levels,
                    available,
                });
            }

            let mut intervals = vec![(0, floor - 1)];
            intervals.extend(split_by_mass(histogram, floor, stop, n_levels - 1));
            intervals
        } else {
            if n_levels > range_len {
                return Err(QuantizerError::TooManyLevels {
                    requested: n_levels,
                    available: range_len,
                });
            }

            split_by_mass(histogram, 0, stop, n_levels)
        };

        let mut map = Vec::with_capacity(range_len);
        for (start, end) in intervals {
            let representative = match histogram.mean_within(start, end) {
                Some(mean) => (mean.round() as usize).clamp(start, end),
                None => (start + end) / 2,
            };
            let representative = u8::try_from(representative).map_err(|_| {
                QuantizerError::Failed(format!(
                    "representative quality score {} does not fit in a byte",
                    representative
                ))
            })?;

            debug!(
                "Quality scores {}..={} quantized to {}.",
                start, end, representative
            );
            map.extend(std::iter::repeat(representative).take(end - start + 1));
        }

        Ok(map)
    }
}

/// Splits `start..=stop` into `n_levels` non-empty, contiguous intervals with
/// roughly equal weight. The caller guarantees `n_levels <= stop - start + 1`.
fn split_by_mass(
    histogram: &Histogram,
    start: usize,
    stop: usize,
    n_levels: usize,
) -> Vec<(usize, usize)> {
    let weights: Vec<u128> = if histogram.sum_within(start, stop) == 0 {
        vec![1; stop - start + 1]
    } else {
        (start..=stop).map(|bin| histogram.get(bin) as u128).collect()
    };
    let total: u128 = weights.iter().sum();

    let mut intervals = Vec::with_capacity(n_levels);
    let mut begin = start;
    let mut accumulated = 0u128;

    for level in 1..n_levels {
        let target = total * level as u128 / n_levels as u128;
        // Leave at least one bin for every interval still to come.
        let last_allowed = stop - (n_levels - level);

        let mut end = begin;
        accumulated += weights[end - start];
        while end < last_allowed && accumulated < target {
            end += 1;
            accumulated += weights[end - start];
        }

        intervals.push((begin, end));
        begin = end + 1;
    }

    intervals.push((begin, stop));
    intervals
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn runs(map: &[u8]) -> usize {
        map.iter().dedup().count()
    }

    #[test]
    fn test_single_level_on_empty_histogram() {
        let histogram = Histogram::zero_based_with_capacity(10);
        let map = QuantileQuantizer.quantize(&histogram, 1, 6).unwrap();
        assert_eq!(map, vec![5; 11]);
    }

    #[test]
    fn test_low_qualities_are_collapsed() {
        let histogram = Histogram::zero_based_with_capacity(9);
        let map = QuantileQuantizer.quantize(&histogram, 3, 3).unwrap();
        assert_eq!(map, [1, 1, 1, 4, 4, 4, 7, 7, 7, 7]);
    }

    #[test]
    fn test_heavy_bin_does_not_swallow_levels() {
        let mut histogram = Histogram::zero_based_with_capacity(9);
        histogram.increment_by(0, 1_000_000).unwrap();
        histogram.increment(9).unwrap();

        let map = QuantileQuantizer.quantize(&histogram, 4, 0).unwrap();
        assert_eq!(map.len(), 10);
        assert_eq!(runs(&map), 4);
        assert_eq!(map[0], 0);
    }

    #[test]
    fn test_every_level_count_yields_that_many_runs() {
        let mut histogram = Histogram::zero_based_with_capacity(40);
        for (qual, count) in [(2, 10), (10, 5000), (20, 12000), (30, 90000), (37, 400)] {
            histogram.increment_by(qual, count).unwrap();
        }

        // 1 leading interval for 0..6 plus 35 bins for 6..=40.
        for n_levels in 1..=36 {
            let map = QuantileQuantizer.quantize(&histogram, n_levels, 6).unwrap();
            assert_eq!(map.len(), 41);
            assert_eq!(runs(&map), n_levels, "n_levels = {}", n_levels);
            assert!(map.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_too_many_levels() {
        let histogram = Histogram::zero_based_with_capacity(9);

        assert_eq!(
            QuantileQuantizer.quantize(&histogram, 9, 3).unwrap_err(),
            QuantizerError::TooManyLevels {
                requested: 9,
                available: 8
            }
        );
        assert_eq!(
            QuantileQuantizer.quantize(&histogram, 11, 0).unwrap_err(),
            QuantizerError::TooManyLevels {
                requested: 11,
                available: 10
            }
        );
        assert_eq!(
            QuantileQuantizer.quantize(&histogram, 0, 0).unwrap_err(),
            QuantizerError::NoLevels
        );
    }
}
