//! Functionality related to the `qualquant requantize` subcommand.

pub mod command;
