//! Demo CLI library for the sequence utilities and promise combinators
//!
//! Provides argument parsing, the scenario [`Runner`] and report output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod output;
pub mod runner;

pub use cli::{Cli, Combinator, Command, OutputFormat};
pub use error::{CliError, CliResult};
pub use output::{Report, Status};
pub use runner::Runner;
