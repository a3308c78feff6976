//! The quantization state: the empirical quality histogram, the map from raw
//! to quantized quality scores, and the number of quantization levels.
//!
//! # Overview
//!
//! A [`QuantizationInfo`] can be built in one of two ways:
//!
//! 1. From an explicit map and histogram ([`QuantizationInfo::new`]). The
//!    number of levels is recomputed by counting the runs of equal values in
//!    the map.
//! 2. From recalibration statistics ([`QuantizationInfo::from_statistics`]).
//!    The histogram is built from the statistics, a [`Quantizer`] computes the
//!    map, and the requested number of levels is taken at its word.
//!
//! The two level-count policies are intentionally different and are kept as
//! separate code paths.
//!
//! ```
//! use qualquant::quality::QualityBounds;
//! use qualquant::quantization::QuantizationInfo;
//! use qualquant::quantizer::QuantileQuantizer;
//! use qualquant::recal::QualityScoreDatum;
//!
//! let data = vec![
//!     QualityScoreDatum::new(10.0, 100),
//!     QualityScoreDatum::new(10.2, 50),
//!     QualityScoreDatum::new(19.6, 30),
//! ];
//!
//! let mut info =
//!     QuantizationInfo::from_statistics(&data, 4, &QuantileQuantizer, QualityBounds::default())
//!         .unwrap();
//! assert_eq!(info.histogram().get(10), 150);
//! assert_eq!(info.histogram().get(20), 30);
//! assert_eq!(info.quantization_levels(), 4);
//!
//! info.no_quantization();
//! assert_eq!(info.quantize(25), Some(25));
//! ```

use std::{error, fmt};

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::quality::QualityBounds;
use crate::quantizer::{Quantizer, QuantizerError};
use crate::recal::QualityScoreStatistics;
use crate::report::{
    ReportTable, QUANTIZED_REPORT_TABLE_DESCRIPTION, QUANTIZED_REPORT_TABLE_TITLE,
};
use crate::utils::histogram::{Histogram, HistogramError};

//====================//
// Quantization error //
//====================//

/// An error that occurs while building or updating a [`QuantizationInfo`].
#[derive(Debug, PartialEq)]
pub enum QuantizationError {
    /// A map or histogram was not sized `max_qual_score + 1`.
    InvalidLength {
        /// What was mis-sized.
        what: &'static str,
        /// The required length.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// An empirical quality rounded to a value outside `0..=max_qual_score`.
    QualityOutOfRange {
        /// The empirical quality as supplied.
        empirical_quality: f64,
        /// The maximum quality score allowed.
        max_qual_score: u8,
    },

    /// Adding observations would overflow the count at a quality score.
    CountOverflow {
        /// The quality score whose count overflowed.
        quality_score: usize,
    },

    /// The quantizer failed.
    Quantizer(QuantizerError),

    /// A report table could not be turned back into a quantization.
    MalformedReport(String),
}

impl fmt::Display for QuantizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{} must have exactly {} entries, found {}",
                what, expected, actual
            ),
            Self::QualityOutOfRange {
                empirical_quality,
                max_qual_score,
            } => write!(
                f,
                "empirical quality {} is outside of the range 0..={}",
                empirical_quality, max_qual_score
            ),
            Self::CountOverflow { quality_score } => write!(
                f,
                "observation count at quality score {} overflowed",
                quality_score
            ),
            Self::Quantizer(err) => write!(f, "{}", err),
            Self::MalformedReport(reason) => write!(f, "malformed quantization report: {}", reason),
        }
    }
}

impl error::Error for QuantizationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Quantizer(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QuantizerError> for QuantizationError {
    fn from(err: QuantizerError) -> Self {
        Self::Quantizer(err)
    }
}

//===================//
// Quantization info //
//===================//

/// Everything needed to quantize quality scores: the histogram the map was
/// derived from, the map itself, and the number of quantization levels.
///
/// Deserializing checks the map and histogram lengths against the bounds,
/// just as [`QuantizationInfo::new`] does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SerializedQuantizationInfo")]
pub struct QuantizationInfo {
    /// Maps each raw quality score (the index) to its quantized value.
    quantized_quals: Vec<u8>,

    /// Number of observations at each empirical quality score.
    empirical_qual_counts: Histogram,

    /// Number of distinct quantization levels.
    quantization_levels: usize,

    /// Bounds the map and histogram are sized by.
    bounds: QualityBounds,
}

/// The unchecked, on-the-wire form of a [`QuantizationInfo`].
#[derive(Deserialize)]
struct SerializedQuantizationInfo {
    quantized_quals: Vec<u8>,
    empirical_qual_counts: Histogram,
    quantization_levels: usize,
    bounds: QualityBounds,
}

impl TryFrom<SerializedQuantizationInfo> for QuantizationInfo {
    type Error = QuantizationError;

    fn try_from(serialized: SerializedQuantizationInfo) -> Result<Self, Self::Error> {
        let SerializedQuantizationInfo {
            quantized_quals,
            empirical_qual_counts,
            quantization_levels,
            bounds,
        } = serialized;

        check_length("quantization map", quantized_quals.len(), &bounds)?;
        check_length(
            "empirical quality histogram",
            empirical_qual_counts.range_len(),
            &bounds,
        )?;

        // The stored level count may have been trusted rather than computed,
        // so it is kept as is.
        Ok(Self {
            quantized_quals,
            empirical_qual_counts,
            quantization_levels,
            bounds,
        })
    }
}

impl QuantizationInfo {
    /// Creates a [`QuantizationInfo`] from an explicit map and histogram. Both
    /// must have `max_qual_score + 1` entries. The number of levels is
    /// recomputed from the map rather than trusted.
    pub fn new(
        quantized_quals: Vec<u8>,
        empirical_qual_counts: Histogram,
        bounds: QualityBounds,
    ) -> Result<Self, QuantizationError> {
        check_length("quantization map", quantized_quals.len(), &bounds)?;
        check_length(
            "empirical quality histogram",
            empirical_qual_counts.range_len(),
            &bounds,
        )?;

        let quantization_levels = count_quantization_levels(&quantized_quals);

        Ok(Self {
            quantized_quals,
            empirical_qual_counts,
            quantization_levels,
            bounds,
        })
    }

    /// Builds the empirical quality histogram from recalibration statistics
    /// and quantizes it to `quantization_levels` levels. The number of levels
    /// is trusted to be what the quantizer produced.
    pub fn from_statistics<S, Q>(
        statistics: &S,
        quantization_levels: usize,
        quantizer: &Q,
        bounds: QualityBounds,
    ) -> Result<Self, QuantizationError>
    where
        S: QualityScoreStatistics + ?Sized,
        Q: Quantizer + ?Sized,
    {
        let mut histogram = Histogram::zero_based_with_capacity(bounds.max_qual_score() as usize);

        for datum in statistics.quality_score_data() {
            let rounded = datum.empirical_quality.round();
            let out_of_range = || QuantizationError::QualityOutOfRange {
                empirical_quality: datum.empirical_quality,
                max_qual_score: bounds.max_qual_score(),
            };

            if !rounded.is_finite() || rounded < 0.0 || !bounds.contains(rounded as usize) {
                return Err(out_of_range());
            }

            histogram
                .increment_by(rounded as usize, datum.num_observations)
                .map_err(|err| match err {
                    HistogramError::CountOverflow(quality_score) => {
                        QuantizationError::CountOverflow { quality_score }
                    }
                    _ => out_of_range(),
                })?;
        }

        info!(
            "Built empirical quality histogram from {} observations.",
            histogram.sum().to_formatted_string(&Locale::en)
        );

        let quantized_quals = run_quantizer(quantizer, &histogram, quantization_levels, &bounds)?;

        Ok(Self {
            quantized_quals,
            empirical_qual_counts: histogram,
            quantization_levels,
            bounds,
        })
    }

    /// Rebuilds a [`QuantizationInfo`] from a previously generated report
    /// table. The table must contain every quality score in
    /// `0..=max_qual_score` exactly once.
    pub fn from_report_table(
        table: &ReportTable,
        bounds: QualityBounds,
    ) -> Result<Self, QuantizationError> {
        let mut quantized_quals: Vec<Option<u8>> = vec![None; bounds.len()];
        let mut counts = vec![0; bounds.len()];

        for row in table.rows() {
            let qual = row.quality_score as usize;
            let slot = quantized_quals.get_mut(qual).ok_or_else(|| {
                QuantizationError::MalformedReport(format!(
                    "quality score {} is greater than the maximum of {}",
                    qual,
                    bounds.max_qual_score()
                ))
            })?;

            if slot.is_some() {
                return Err(QuantizationError::MalformedReport(format!(
                    "quality score {} appears more than once",
                    qual
                )));
            }

            *slot = Some(row.quantized_score);
            counts[qual] = row.count;
        }

        let quantized_quals = quantized_quals
            .into_iter()
            .enumerate()
            .map(|(qual, quantized)| {
                quantized.ok_or_else(|| {
                    QuantizationError::MalformedReport(format!(
                        "quality score {} is missing",
                        qual
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let histogram = Histogram::from_values(counts)
            .map_err(|err| QuantizationError::MalformedReport(err.to_string()))?;

        Self::new(quantized_quals, histogram, bounds)
    }

    /// Recomputes the quantization map from the existing histogram with a new
    /// number of levels. The histogram is not rebuilt. If the quantizer fails,
    /// the current state is left as it was.
    pub fn quantize_quality_scores<Q>(
        &mut self,
        quantization_levels: usize,
        quantizer: &Q,
    ) -> Result<(), QuantizationError>
    where
        Q: Quantizer + ?Sized,
    {
        let quantized_quals = run_quantizer(
            quantizer,
            &self.empirical_qual_counts,
            quantization_levels,
            &self.bounds,
        )?;

        self.quantized_quals = quantized_quals;
        self.quantization_levels = quantization_levels;
        Ok(())
    }

    /// Switches quantization off by resetting the map to the identity.
    ///
    /// Only quality scores below `max_qual_score` are reset; the entry for
    /// `max_qual_score` itself keeps whatever value it had.
    pub fn no_quantization(&mut self) {
        debug!("Disabling quality score quantization.");

        self.quantization_levels = self.bounds.max_qual_score() as usize;
        for qual in 0..self.bounds.max_qual_score() {
            self.quantized_quals[qual as usize] = qual;
        }
    }

    /// The map from raw quality score (the index) to quantized value.
    pub fn quantized_quals(&self) -> &[u8] {
        &self.quantized_quals
    }

    /// The number of quantization levels.
    pub fn quantization_levels(&self) -> usize {
        self.quantization_levels
    }

    /// The empirical quality histogram the map was derived from.
    pub fn histogram(&self) -> &Histogram {
        &self.empirical_qual_counts
    }

    /// The bounds this quantization was computed within.
    pub fn bounds(&self) -> QualityBounds {
        self.bounds
    }

    /// Quantizes a single raw quality score, or `None` if it is out of range.
    pub fn quantize(&self, qual: u8) -> Option<u8> {
        self.quantized_quals.get(qual as usize).copied()
    }

    /// Produces the quantization report: one row per quality score in
    /// `0..=max_qual_score` with its observation count and quantized value.
    pub fn generate_report_table(&self) -> ReportTable {
        let mut table = ReportTable::new(
            QUANTIZED_REPORT_TABLE_TITLE,
            QUANTIZED_REPORT_TABLE_DESCRIPTION,
        );

        for qual in 0..=self.bounds.max_qual_score() {
            table.add_row(
                qual,
                self.empirical_qual_counts.get(qual as usize),
                self.quantized_quals[qual as usize],
            );
        }

        table
    }
}

/// Counts the maximal runs of equal values in a quantization map.
///
/// ```
/// use qualquant::quantization::count_quantization_levels;
///
/// assert_eq!(count_quantization_levels(&[0, 0, 0, 5, 5, 5, 5]), 2);
/// assert_eq!(count_quantization_levels(&[3, 3, 3]), 1);
/// assert_eq!(count_quantization_levels(&[1, 2, 1]), 3);
/// ```
pub fn count_quantization_levels(quantized_quals: &[u8]) -> usize {
    let mut last: Option<u8> = None;
    let mut levels = 0;

    for &qual in quantized_quals {
        if last != Some(qual) {
            levels += 1;
            last = Some(qual);
        }
    }

    levels
}

fn check_length(
    what: &'static str,
    actual: usize,
    bounds: &QualityBounds,
) -> Result<(), QuantizationError> {
    if actual != bounds.len() {
        return Err(QuantizationError::InvalidLength {
            what,
            expected: bounds.len(),
            actual,
        });
    }

    Ok(())
}

fn run_quantizer<Q>(
    quantizer: &Q,
    histogram: &Histogram,
    quantization_levels: usize,
    bounds: &QualityBounds,
) -> Result<Vec<u8>, QuantizationError>
where
    Q: Quantizer + ?Sized,
{
    let quantized_quals =
        quantizer.quantize(histogram, quantization_levels, bounds.min_usable_q_score())?;
    check_length("quantization map", quantized_quals.len(), bounds)?;

    debug!(
        "Quantized quality scores into {} levels: {:?}",
        quantization_levels, quantized_quals
    );

    Ok(quantized_quals)
}
