//! In-memory recalibration tables.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::{error, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EventType, QualityScoreDatum, QualityScoreStatistics, RecalDatum};
use crate::quality::QualityBounds;

/// One line of raw recalibration input: the counts observed for a given read
/// group, reported quality score and event type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// The read group the observations came from.
    pub read_group: String,

    /// The quality score reported by the sequencer.
    pub quality_score: u8,

    /// The kind of event observed.
    pub event_type: EventType,

    /// The number of bases observed.
    pub observations: u64,

    /// The number of observed bases that were mismatches.
    pub mismatches: f64,
}

/// An error that occurs when folding a datum into a table cell would overflow
/// the cell's observation count.
#[derive(Debug, PartialEq, Eq)]
pub struct ObservationOverflowError {
    /// The read group of the cell.
    pub read_group: String,

    /// The reported quality score of the cell.
    pub quality_score: u8,

    /// The event type of the cell.
    pub event_type: EventType,
}

impl fmt::Display for ObservationOverflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "observation count overflowed for read group {}, quality score {}, event type {}",
            self.read_group, self.quality_score, self.event_type
        )
    }
}

impl error::Error for ObservationOverflowError {}

/// Key of the quality score table.
pub type QualityScoreKey = (String, u8, EventType);

/// Recalibration tables keyed by read group, reported quality score and event
/// type. Only the quality score table is kept, as that is all quantization
/// needs.
#[derive(Clone, Debug, Default)]
pub struct RecalibrationTables {
    /// Bounds used to cap the empirical qualities handed out.
    bounds: QualityBounds,

    /// The quality score table.
    quality_score_table: HashMap<QualityScoreKey, RecalDatum>,
}

impl RecalibrationTables {
    /// Creates an empty set of tables whose empirical qualities are capped at
    /// the maximum quality score of `bounds`.
    pub fn new(bounds: QualityBounds) -> Self {
        Self {
            bounds,
            quality_score_table: HashMap::new(),
        }
    }

    /// Creates tables populated from a list of [`ObservationRecord`]s.
    pub fn from_records<I>(bounds: QualityBounds, records: I) -> Result<Self, ObservationOverflowError>
    where
        I: IntoIterator<Item = ObservationRecord>,
    {
        let mut tables = Self::new(bounds);

        for record in records {
            tables.add(
                record.read_group,
                record.quality_score,
                record.event_type,
                RecalDatum::new(record.observations, record.mismatches),
            )?;
        }

        debug!(
            "Populated quality score table with {} cells.",
            tables.quality_score_table.len()
        );

        Ok(tables)
    }

    /// Folds a datum into the quality score table.
    pub fn add(
        &mut self,
        read_group: impl Into<String>,
        quality_score: u8,
        event_type: EventType,
        datum: RecalDatum,
    ) -> Result<(), ObservationOverflowError> {
        match self
            .quality_score_table
            .entry((read_group.into(), quality_score, event_type))
        {
            Entry::Occupied(mut entry) => {
                let combined = entry.get().checked_combine(&datum).ok_or_else(|| {
                    ObservationOverflowError {
                        read_group: entry.key().0.clone(),
                        quality_score,
                        event_type,
                    }
                })?;
                *entry.get_mut() = combined;
            }
            Entry::Vacant(entry) => {
                entry.insert(datum);
            }
        }

        Ok(())
    }

    /// Looks up a cell of the quality score table.
    pub fn get(
        &self,
        read_group: &str,
        quality_score: u8,
        event_type: EventType,
    ) -> Option<&RecalDatum> {
        self.quality_score_table
            .get(&(read_group.to_string(), quality_score, event_type))
    }

    /// The number of populated cells in the quality score table.
    pub fn len(&self) -> usize {
        self.quality_score_table.len()
    }

    /// Whether the quality score table is empty.
    pub fn is_empty(&self) -> bool {
        self.quality_score_table.is_empty()
    }
}

impl QualityScoreStatistics for RecalibrationTables {
    fn quality_score_data(&self) -> Box<dyn Iterator<Item = QualityScoreDatum> + '_> {
        let cap = self.bounds.max_qual_score();
        Box::new(self.quality_score_table.values().map(move |datum| {
            QualityScoreDatum::new(datum.empirical_quality(cap), datum.num_observations)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rg: &str, qual: u8, event: EventType, obs: u64, mm: f64) -> ObservationRecord {
        ObservationRecord {
            read_group: rg.to_string(),
            quality_score: qual,
            event_type: event,
            observations: obs,
            mismatches: mm,
        }
    }

    #[test]
    fn test_records_with_the_same_key_are_combined() {
        let tables = RecalibrationTables::from_records(
            QualityBounds::default(),
            vec![
                record("RG1", 30, EventType::BaseSubstitution, 500, 1.0),
                record("RG1", 30, EventType::BaseSubstitution, 498, 8.0),
                record("RG1", 30, EventType::BaseInsertion, 10, 0.0),
                record("RG2", 30, EventType::BaseSubstitution, 10, 0.0),
            ],
        )
        .unwrap();

        assert_eq!(tables.len(), 3);
        let datum = tables
            .get("RG1", 30, EventType::BaseSubstitution)
            .unwrap();
        assert_eq!(datum.num_observations, 998);
        assert_eq!(datum.num_mismatches, 9.0);
        assert!(tables.get("RG3", 30, EventType::BaseSubstitution).is_none());
    }

    #[test]
    fn test_quality_score_data_is_capped() {
        let bounds = QualityBounds::new(30, 6);
        let mut tables = RecalibrationTables::new(bounds);
        tables.add(
            "RG1",
            40,
            EventType::BaseSubstitution,
            RecalDatum::new(1_000_000, 0.0),
        )
        .unwrap();

        let data: Vec<_> = tables.quality_score_data().collect();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].empirical_quality, 30.0);
        assert_eq!(data[0].num_observations, 1_000_000);
    }

    #[test]
    fn test_overflowing_observations_are_rejected() {
        let json = r#"[
            {"read_group":"RG1","quality_score":30,"event_type":"M","observations":18446744073709551615,"mismatches":0.0},
            {"read_group":"RG1","quality_score":30,"event_type":"M","observations":1,"mismatches":0.0}
        ]"#;
        let records: Vec<ObservationRecord> = serde_json::from_str(json).unwrap();

        let err = RecalibrationTables::from_records(QualityBounds::default(), records).unwrap_err();
        assert_eq!(
            err,
            ObservationOverflowError {
                read_group: String::from("RG1"),
                quality_score: 30,
                event_type: EventType::BaseSubstitution,
            }
        );
        assert_eq!(
            err.to_string(),
            "observation count overflowed for read group RG1, quality score 30, event type M"
        );
    }

    #[test]
    fn test_failed_add_leaves_cell_alone() {
        let mut tables = RecalibrationTables::new(QualityBounds::default());
        assert!(tables.is_empty());

        tables
            .add("RG1", 20, EventType::BaseDeletion, RecalDatum::new(u64::MAX, 2.0))
            .unwrap();
        assert!(tables
            .add("RG1", 20, EventType::BaseDeletion, RecalDatum::new(5, 1.0))
            .is_err());

        let datum = tables.get("RG1", 20, EventType::BaseDeletion).unwrap();
        assert_eq!(datum, &RecalDatum::new(u64::MAX, 2.0));
        assert!(!tables.is_empty());
    }

    #[test]
    fn test_observation_records_deserialize() {
        let json = r#"[{"read_group":"RG1","quality_score":30,"event_type":"M","observations":10,"mismatches":0.0}]"#;
        let records: Vec<ObservationRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(
            records,
            vec![record("RG1", 30, EventType::BaseSubstitution, 10, 0.0)]
        );
    }
}
