//! Utilities that are used across the `qualquant` subcommands.

pub mod args;
pub mod display;
pub mod histogram;
