//! Command-line interface.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`run`] - Builds the run context from arguments and starts the run

pub mod args;
pub mod run;

pub use args::Cli;
pub use run::run;
