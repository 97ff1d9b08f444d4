//! prims
//!
//! Entry point for the demo CLI. Parses arguments, installs the logger and
//! delegates to the Runner.

use clap::Parser;
use prims_cli::{output, Cli, Runner};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let runner = Runner::new(cli.event_loop_config());
    let rendered = runner
        .run(&cli.command)
        .and_then(|reports| output::render(&reports, cli.format));

    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
