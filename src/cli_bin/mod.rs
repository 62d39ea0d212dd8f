//! Command-line layer: argument parsing and command handlers
//!
//! Handlers bridge parsed arguments to library operations and turn their
//! results into printed reports and exit codes.

pub mod args;
pub mod commands;
