//! Functionality relating to the `qualquant quantize` subcommand itself.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::quality::QualityBounds;
use crate::quantization::QuantizationInfo;
use crate::quantizer::QuantileQuantizer;
use crate::recal::tables::ObservationRecord;
use crate::recal::RecalibrationTables;
use crate::utils::args::{levels_in_range, QualityBoundsArgs};
use crate::utils::display::print_quantization;

/// Clap arguments for the `qualquant quantize` subcommand.
#[derive(Args)]
pub struct QuantizeArgs {
    /// Recalibration observations as a JSON array.
    #[arg(value_name = "JSON")]
    src: PathBuf,

    /// Number of quantization levels.
    #[arg(short, long, value_name = "USIZE", default_value = "16")]
    #[arg(value_parser = levels_in_range)]
    levels: usize,

    /// Keep the original quality scores rather than quantizing them.
    #[arg(long)]
    no_quantization: bool,

    /// Write the quantization report as JSON to this path.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    #[command(flatten)]
    bounds: QualityBoundsArgs,
}

/// Main function for the `qualquant quantize` subcommand.
pub fn quantize(args: QuantizeArgs) -> anyhow::Result<()> {
    info!("Starting quantize subcommand.");

    let bounds = QualityBounds::from(args.bounds);

    // (1) Read the recalibration observations and fold them into the
    // recalibration tables.
    let contents = fs::read_to_string(&args.src)
        .with_context(|| format!("could not read observations: {}", args.src.display()))?;
    let records: Vec<ObservationRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("could not parse observations: {}", args.src.display()))?;
    let tables = RecalibrationTables::from_records(bounds, records)
        .with_context(|| format!("could not tabulate observations: {}", args.src.display()))?;

    if tables.is_empty() {
        warn!("No observations were found in {}.", args.src.display());
    } else {
        info!("Read {} quality score table cells.", tables.len());
    }

    // (2) Build the histogram and quantize it.
    let mut quantization =
        QuantizationInfo::from_statistics(&tables, args.levels, &QuantileQuantizer, bounds)?;

    if args.no_quantization {
        quantization.no_quantization();
    }

    // (3) Report the results.
    print_quantization(&quantization);

    if let Some(output) = args.output {
        quantization.generate_report_table().write(&output)?;
        info!("Wrote quantization report to {}.", output.display());
    }

    Ok(())
}
