//! Utilities related to displaying things.

use std::fmt;

use num_format::Locale;
use num_format::ToFormattedString;
use tracing::info;

use crate::quantization::QuantizationInfo;

/// Utility struct for displays percentages. The first item in the struct is the
/// numerator and the second item in the struct is the denominator.
pub struct PercentageFormat(pub u128, pub u128);

impl fmt::Display for PercentageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 == 0 {
            f.write_str("N/A")
        } else {
            let (a, b) = (self.0 as f64, self.1 as f64);
            write!(f, "{:.2}%", a / b * 100.0)
        }
    }
}

/// Counts the observations whose quality score is changed by the
/// quantization map.
pub fn observations_changed(quantization: &QuantizationInfo) -> u128 {
    quantization
        .quantized_quals()
        .iter()
        .enumerate()
        .filter(|(qual, quantized)| *qual != **quantized as usize)
        .map(|(qual, _)| quantization.histogram().get(qual) as u128)
        .sum()
}

/// Logs a summary of a quantization and prints its report table to stdout.
pub fn print_quantization(quantization: &QuantizationInfo) {
    let total = quantization.histogram().sum();
    let changed = observations_changed(quantization);

    info!(
        "Quantization uses {} levels.",
        quantization.quantization_levels()
    );
    info!(
        "  [*] {} of {} observations change quality score ({}).",
        changed.to_formatted_string(&Locale::en),
        total.to_formatted_string(&Locale::en),
        PercentageFormat(changed, total)
    );

    quantization.generate_report_table().to_table().printstd();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityBounds;
    use crate::utils::histogram::Histogram;

    #[test]
    fn test_percentage_format() {
        assert_eq!(PercentageFormat(1, 4).to_string(), "25.00%");
        assert_eq!(PercentageFormat(0, 0).to_string(), "N/A");
    }

    #[test]
    fn test_observations_changed() {
        let histogram = Histogram::from_values(vec![1, 2, 4, 8]).unwrap();
        let quantization =
            QuantizationInfo::new(vec![1, 1, 2, 2], histogram, QualityBounds::new(3, 0)).unwrap();

        // Qualities 0 and 3 move.
        assert_eq!(observations_changed(&quantization), 9);
    }

    #[test]
    fn test_observations_changed_does_not_overflow() {
        let histogram = Histogram::from_values(vec![u64::MAX, u64::MAX]).unwrap();
        let quantization =
            QuantizationInfo::new(vec![1, 0], histogram, QualityBounds::new(1, 0)).unwrap();

        assert_eq!(observations_changed(&quantization), 2 * u64::MAX as u128);
        assert_eq!(
            PercentageFormat(observations_changed(&quantization), quantization.histogram().sum())
                .to_string(),
            "100.00%"
        );
    }
}
