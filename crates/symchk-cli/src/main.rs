use symchk_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible; a read-only state dir is not fatal.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable ({:#}), logging to stderr", e);
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("symchk error: {:#}", err);
        std::process::exit(1);
    }
}
