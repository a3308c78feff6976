//! Utilities related to the parsing of arguments.

use clap::Args;
use tracing::debug;

use crate::quality::{QualityBounds, MAX_QUAL_SCORE, MIN_USABLE_Q_SCORE};

//======================//
// Quantization levels  //
//======================//

/// Utility method to parse the number of quantization levels passed in on the
/// command line and ensure it is at least one.
pub fn levels_in_range(levels_raw: &str) -> Result<usize, String> {
    let levels: usize = levels_raw
        .parse()
        .map_err(|_| format!("{} isn't a non-negative integer", levels_raw))?;

    match levels >= 1 {
        true => Ok(levels),
        false => Err(String::from(
            "Number of quantization levels must be at least 1",
        )),
    }
}

//================//
// Quality bounds //
//================//

/// Command line arguments for the quality score bounds.
#[derive(Args, Clone, Debug)]
pub struct QualityBoundsArgs {
    /// Maximum quality score considered (inclusive).
    #[arg(long, value_name = "U8", default_value_t = MAX_QUAL_SCORE)]
    pub max_qual_score: u8,

    /// Quality scores below this are treated as unusable by the quantizer.
    #[arg(long, value_name = "U8", default_value_t = MIN_USABLE_Q_SCORE)]
    pub min_usable_q_score: u8,
}

impl From<QualityBoundsArgs> for QualityBounds {
    fn from(args: QualityBoundsArgs) -> Self {
        debug!(
            "Using quality scores 0..={} with a minimum usable quality score of {}.",
            args.max_qual_score, args.min_usable_q_score
        );
        QualityBounds::new(args.max_qual_score, args.min_usable_q_score)
    }
}
