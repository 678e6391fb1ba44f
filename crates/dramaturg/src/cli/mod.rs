//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the dramaturg binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{
    CommandContext, GenerateArgs, run_analyze, run_designs, run_export, run_generate, run_optimize,
};
