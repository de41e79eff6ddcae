use std::{path::PathBuf, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";
const MAX_LOG_FILES: usize = 5;

/// Where and how much to log. Stdout is never used, it only carries the report.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    /// Falls back to `RUST_LOG`, then to `debug`.
    pub level: Option<LevelFilter>,
    pub mirror_to_stderr: bool,
}

impl LoggingConfig {
    /// Filter directive limited to this crate, e.g. `usage_report=info`.
    fn directive(&self, rust_log: Option<&str>) -> String {
        let level = match (self.level, rust_log) {
            (Some(level), _) => level.to_string(),
            (None, Some(env_level)) => env_level.to_string(),
            (None, None) => "debug".into(),
        };
        format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
    }
}

/// Logs into daily rotating files named after `prefix`.
pub fn enable_logging(prefix: &str, config: &LoggingConfig) -> Result<()> {
    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .build(&config.dir)?;

    let mirror = config.mirror_to_stderr;
    let stderr = std::io::stderr.with_filter(move |_| mirror);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            config.directive(std::env::var("RUST_LOG").ok().as_deref()),
        ))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stderr.and(appender))
        .with_ansi(false)
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});
