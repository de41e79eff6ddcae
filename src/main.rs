use std::process::ExitCode;

use tracing::error;
use usage_report::cli::run_cli;

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error running cli {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
