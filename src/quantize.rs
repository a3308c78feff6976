//! Functionality related to the `qualquant quantize` subcommand.

pub mod command;
