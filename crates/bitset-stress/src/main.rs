mod cli;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;

use bitset_stress::{
    load_config, logging, print_error, print_info, print_warning, run_fill, run_toggle, Config,
    Report, StressError,
};

use crate::cli::{Cli, Command};

fn run(cli: &Cli, stop: &AtomicBool) -> Result<Report, StressError> {
    let base = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let config = cli.command.overrides().apply(base);
    print_info!(
        "capacity {} bits, {} thread(s)",
        config.capacity,
        config.threads
    );
    match cli.command {
        Command::Fill(_) => run_fill(&config, stop),
        Command::Toggle(_) => run_toggle(&config, stop),
    }
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::setup(cli.verbose, cli.no_color) {
        eprintln!("unable to set up logger: {e}");
        return ExitCode::FAILURE;
    }

    // Ctrl+C asks workers to wrap up at the next check
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed)) {
        print_warning!("failed to set Ctrl+C handler: {e}");
    }

    match run(&cli, &stop) {
        Ok(report) => {
            print_info!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error!("{e}");
            ExitCode::FAILURE
        }
    }
}
