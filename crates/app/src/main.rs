mod cli;
mod commands;
mod logging;

use log::warn;
use services::{Clock, StudyTracker};

use crate::cli::Command;
use crate::commands::AppError;

fn run() -> Result<(), AppError> {
    let invocation = cli::parse(std::env::args().skip(1), |key| std::env::var(key).ok())?;
    if invocation.command == Command::Help {
        cli::print_usage();
        return Ok(());
    }
    let config = invocation.config;

    // Logging is best-effort.
    if let Err(err) = logging::init_logging(config.log_level, &config.data_dir.join("logs")) {
        eprintln!("warning: logging disabled: {err}");
    }

    let tracker = StudyTracker::open(config.data_dir.clone(), Clock::default_clock(), config.store)
        .inspect_err(|err| warn!("event=tracker_open module=app status=error error={err}"))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(&invocation.command, &tracker, &mut out)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        if matches!(err, AppError::Args(_)) {
            cli::print_usage();
        }
        std::process::exit(err.exit_code());
    }
}
