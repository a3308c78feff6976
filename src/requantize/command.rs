//! Functionality relating to the `qualquant requantize` subcommand itself.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::quality::QualityBounds;
use crate::quantization::QuantizationInfo;
use crate::quantizer::QuantileQuantizer;
use crate::report::ReportTable;
use crate::utils::args::{levels_in_range, QualityBoundsArgs};
use crate::utils::display::print_quantization;

/// Clap arguments for the `qualquant requantize` subcommand.
#[derive(Args)]
pub struct RequantizeArgs {
    /// A quantization report previously written by `qualquant`.
    #[arg(value_name = "JSON")]
    src: PathBuf,

    /// Number of quantization levels.
    #[arg(short, long, value_name = "USIZE")]
    #[arg(value_parser = levels_in_range)]
    levels: usize,

    /// Write the new quantization report as JSON to this path.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    #[command(flatten)]
    bounds: QualityBoundsArgs,
}

/// Main function for the `qualquant requantize` subcommand.
pub fn requantize(args: RequantizeArgs) -> anyhow::Result<()> {
    info!("Starting requantize subcommand.");

    let bounds = QualityBounds::from(args.bounds);
    let table = ReportTable::read(&args.src)?;
    let mut quantization = QuantizationInfo::from_report_table(&table, bounds)?;

    info!(
        "Loaded quantization with {} levels from {}.",
        quantization.quantization_levels(),
        args.src.display()
    );

    quantization.quantize_quality_scores(args.levels, &QuantileQuantizer)?;
    print_quantization(&quantization);

    if let Some(output) = args.output {
        quantization.generate_report_table().write(&output)?;
        info!("Wrote quantization report to {}.", output.display());
    }

    Ok(())
}
