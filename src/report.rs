//! The tabular quantization report.
//!
//! A [`ReportTable`] has exactly three columns: the raw quality score, the
//! number of observations at that quality score, and the quantized value it
//! maps to. It can be rendered for humans (via [`prettytable`]) or persisted
//! as JSON and read back in later.

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use prettytable::{row, Table};
use serde::{Deserialize, Serialize};

/// Title of the quantization report table.
pub const QUANTIZED_REPORT_TABLE_TITLE: &str = "Quantized";

/// Description of the quantization report table.
pub const QUANTIZED_REPORT_TABLE_DESCRIPTION: &str = "Quality quantization map";

/// Name of the raw quality score column.
pub const QUALITY_SCORE_COLUMN_NAME: &str = "QualityScore";

/// Name of the observation count column.
pub const QUANTIZED_COUNT_COLUMN_NAME: &str = "Count";

/// Name of the quantized value column.
pub const QUANTIZED_VALUE_COLUMN_NAME: &str = "QuantizedScore";

/// One row of the quantization report.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// The raw quality score.
    #[serde(rename = "QualityScore")]
    pub quality_score: u8,

    /// The number of observations with this empirical quality score.
    #[serde(rename = "Count")]
    pub count: u64,

    /// The value this quality score is quantized to.
    #[serde(rename = "QuantizedScore")]
    pub quantized_score: u8,
}

/// A titled, three column report table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    title: String,
    description: String,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Creates an empty [`ReportTable`].
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            rows: Vec::new(),
        }
    }

    /// The title of the table.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The description of the table.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The column names, in order.
    pub fn columns(&self) -> [&'static str; 3] {
        [
            QUALITY_SCORE_COLUMN_NAME,
            QUANTIZED_COUNT_COLUMN_NAME,
            QUANTIZED_VALUE_COLUMN_NAME,
        ]
    }

    /// Appends a row to the table.
    pub fn add_row(&mut self, quality_score: u8, count: u64, quantized_score: u8) {
        self.rows.push(ReportRow {
            quality_score,
            count,
            quantized_score,
        });
    }

    /// The rows of the table, in insertion order.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Renders the table (header included) for display.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        let [quality, count, quantized] = self.columns();

        table.add_row(row![quality, count, quantized]);
        for r in &self.rows {
            table.add_row(row![r.quality_score, r.count, r.quantized_score]);
        }

        table
    }

    /// Attempts to write the [`ReportTable`] as JSON to the given path.
    pub fn write(&self, filepath: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = filepath.as_ref();
        let mut file = File::create(path)
            .with_context(|| format!("could not create report file: {}", path.display()))?;
        let output = serde_json::to_string_pretty(&self)?;
        file.write_all(output.as_bytes())?;

        Ok(())
    }

    /// Attempts to read a [`ReportTable`] from a JSON file.
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<ReportTable> {
        let path = filepath.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read report file: {}", path.display()))?;
        Ok(serde_json::from_str(&contents)?)
    }
}
