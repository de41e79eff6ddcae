pub mod output;
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use report::{process_report_command, ReportCommand};
use tracing::level_filters::LevelFilter;

use crate::utils::{
    clock::DefaultClock,
    dir::create_application_default_path,
    logging::{enable_logging, LoggingConfig, CLI_PREFIX},
};

#[derive(Parser, Debug)]
#[command(name = "usage-report", version, long_about = None)]
#[command(about = "Reports statistics from exported time-tracking and wellness data", long_about = None)]
pub struct Args {
    #[command(flatten)]
    report: ReportCommand,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(long = "log-filter", help = "Log level, for example info or trace")]
    log_filter: Option<LevelFilter>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console", help = "Mirror logs to stderr")]
    log_console: bool,
    #[arg(
        long = "log-dir",
        help = "Log directory. By default logs go into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn logging_level(&self) -> Option<LevelFilter> {
        match (self.log_filter, self.log) {
            (Some(level), _) => Some(level),
            (None, true) => Some(LevelFilter::TRACE),
            (None, false) => None,
        }
    }

    /// Logging runs with an explicit level, or with `RUST_LOG` set in the environment.
    fn logging_enabled(&self, rust_log_set: bool) -> bool {
        self.logging_level().is_some() || rust_log_set
    }
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    if args.logging_enabled(std::env::var_os("RUST_LOG").is_some()) {
        let dir = match &args.log_dir {
            Some(dir) => dir.clone(),
            None => create_application_default_path()?.join("logs"),
        };
        let config = LoggingConfig {
            dir,
            level: args.logging_level(),
            mirror_to_stderr: args.log_console,
        };
        enable_logging(CLI_PREFIX, &config)?;
    }

    let stdout = std::io::stdout();
    process_report_command(&args.report, &DefaultClock, &mut stdout.lock())
}
