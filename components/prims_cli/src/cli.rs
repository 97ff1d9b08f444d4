//! Command line arguments

use async_runtime::{ClockMode, EventLoopConfig};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

/// Demonstrates the sequence utilities and promise combinators
#[derive(Parser, Debug)]
#[command(name = "prims", version)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Wait for timers in wall-clock time instead of jumping the clock
    #[arg(long)]
    pub real_time: bool,

    /// Abort a scenario after this many event loop turns
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Scenario to run
    #[command(subcommand)]
    pub command: Command,
}

/// Scenarios
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply the promise combinators to three timed promises
    Combinators {
        /// Run a single combinator instead of all four
        #[arg(long, value_enum)]
        only: Option<Combinator>,
    },
    /// Run every sequence utility over a sample array with a hole
    Arrays,
}

/// Promise combinator selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Promise.all
    All,
    /// Promise.race
    Race,
    /// Promise.last
    Last,
    /// Promise.ignoreErrors
    IgnoreErrors,
}

impl Combinator {
    /// Every combinator, in display order.
    pub const ALL: [Combinator; 4] = [
        Combinator::All,
        Combinator::Race,
        Combinator::Last,
        Combinator::IgnoreErrors,
    ];

    /// Display name, e.g. `Promise.ignoreErrors`.
    pub fn name(self) -> &'static str {
        match self {
            Combinator::All => "Promise.all",
            Combinator::Race => "Promise.race",
            Combinator::Last => "Promise.last",
            Combinator::IgnoreErrors => "Promise.ignoreErrors",
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable line per result
    Text,
    /// A pretty-printed JSON array
    Json,
}

impl Cli {
    /// Event loop settings derived from the flags.
    pub fn event_loop_config(&self) -> EventLoopConfig {
        let clock = if self.real_time {
            ClockMode::RealTime
        } else {
            ClockMode::Virtual
        };
        let config = EventLoopConfig::new().with_clock(clock);
        match self.max_turns {
            Some(limit) => config.with_max_turns(limit),
            None => config,
        }
    }

    /// Log level for `-v` flags; `RUST_LOG` still takes precedence.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
