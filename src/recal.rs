//! Recalibration statistics that quantization histograms are built from.
//!
//! The quantization core only needs one thing from the recalibration engine:
//! for the quality score table, every aggregated datum's empirical quality and
//! number of observations. That is captured by the [`QualityScoreStatistics`]
//! trait. [`RecalibrationTables`] is the concrete, in-memory implementation
//! used by the command line tool.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod datum;
pub mod tables;

pub use datum::RecalDatum;
pub use tables::RecalibrationTables;

//============//
// Event type //
//============//

/// The kind of sequencing event a recalibration datum describes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum EventType {
    /// A mismatch against the reference.
    #[serde(rename = "M")]
    BaseSubstitution,

    /// An insertion relative to the reference.
    #[serde(rename = "I")]
    BaseInsertion,

    /// A deletion relative to the reference.
    #[serde(rename = "D")]
    BaseDeletion,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseSubstitution => write!(f, "M"),
            Self::BaseInsertion => write!(f, "I"),
            Self::BaseDeletion => write!(f, "D"),
        }
    }
}

//=====================//
// Quality score datum //
//=====================//

/// A single aggregated data point from the quality score table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityScoreDatum {
    /// The empirical quality estimate. Already capped at the maximum quality
    /// score, but not necessarily an integer.
    pub empirical_quality: f64,

    /// The number of observations backing this data point.
    pub num_observations: u64,
}

impl QualityScoreDatum {
    /// Creates a new [`QualityScoreDatum`].
    pub fn new(empirical_quality: f64, num_observations: u64) -> Self {
        Self {
            empirical_quality,
            num_observations,
        }
    }
}

/// A source of aggregated data points for the quality score dimension of the
/// recalibration tables.
pub trait QualityScoreStatistics {
    /// Enumerates every aggregated data point in the quality score table.
    fn quality_score_data(&self) -> Box<dyn Iterator<Item = QualityScoreDatum> + '_>;
}

impl QualityScoreStatistics for [QualityScoreDatum] {
    fn quality_score_data(&self) -> Box<dyn Iterator<Item = QualityScoreDatum> + '_> {
        Box::new(self.iter().copied())
    }
}

impl QualityScoreStatistics for Vec<QualityScoreDatum> {
    fn quality_score_data(&self) -> Box<dyn Iterator<Item = QualityScoreDatum> + '_> {
        self.as_slice().quality_score_data()
    }
}
