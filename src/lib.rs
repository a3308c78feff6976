//! `qualquant` derives and stores the quality score quantization used by base
//! quality score recalibration. This package is composed of both a library
//! crate, as well as a binary crate.
//!
//! The heart of the library is
//! [`QuantizationInfo`](quantization::QuantizationInfo): it owns the histogram
//! of empirical quality scores, the map from raw to quantized quality scores,
//! and the number of quantization levels, and keeps the three consistent.
//! The statistics it is built from ([`recal`]) and the algorithm that computes
//! the map ([`quantizer`]) are pluggable.
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]

pub mod quality;
pub mod quantization;
pub mod quantize;
pub mod quantizer;
pub mod recal;
pub mod report;
pub mod requantize;
pub mod utils;
