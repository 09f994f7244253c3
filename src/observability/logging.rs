//! Process logging.
//!
//! Every line reads `[time] | ~/file:line | LEVEL | message`, coloured by
//! level on terminals. Lifecycle banners go through [`flair!`](crate::flair)
//! and are shown as a separate `FLAIR` level. An optional file sink rotates
//! daily and never carries colour codes.

use chrono::Local;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Target used by lifecycle banners.
pub const FLAIR_TARGET: &str = "flair";

const RESET: &str = "\x1b[0m";

/// Log at info level under the `FLAIR` banner style.
#[macro_export]
macro_rules! flair {
    ($($arg:tt)+) => {
        ::tracing::info!(target: $crate::observability::logging::FLAIR_TARGET, $($arg)+)
    };
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot create log directory {path}: {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Display style for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Flair,
}

impl LogStyle {
    pub fn of(level: &Level, target: &str) -> Self {
        if target == FLAIR_TARGET {
            return LogStyle::Flair;
        }
        match *level {
            Level::TRACE => LogStyle::Trace,
            Level::DEBUG => LogStyle::Debug,
            Level::INFO => LogStyle::Info,
            Level::WARN => LogStyle::Warning,
            Level::ERROR => LogStyle::Error,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogStyle::Trace => "TRACE",
            LogStyle::Debug => "DEBUG",
            LogStyle::Info => "INFO",
            LogStyle::Warning => "WARNING",
            LogStyle::Error => "ERROR",
            LogStyle::Flair => "FLAIR",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            LogStyle::Trace | LogStyle::Debug => "\x1b[96m",
            LogStyle::Info => "\x1b[92m",
            LogStyle::Warning => "\x1b[93m",
            LogStyle::Error => "\x1b[91m",
            LogStyle::Flair => "\x1b[95m",
        }
    }
}

/// Line formatter for both sinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let style = LogStyle::of(meta.level(), meta.target());
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "{}", style.color())?;
        }
        write!(
            writer,
            "[{}] | ~/{}:{} | {} | ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            meta.file().unwrap_or_else(|| meta.target()),
            meta.line().unwrap_or(0),
            style.label(),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        if ansi {
            write!(writer, "{RESET}")?;
        }
        writeln!(writer)
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level. The returned guard must stay
/// alive for as long as the file sink should keep flushing.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(config.color);

    let (file, guard) = if config.file {
        let (writer, guard) = file_writer(config)?;
        let layer = tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .try_init()?;

    Ok(guard)
}

fn file_writer(
    config: &LoggingConfig,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), LoggingError> {
    let directory = Path::new(&config.directory);
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::Directory {
        path: config.directory.clone(),
        source,
    })?;

    let appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix(&config.extension)
        .build(directory)?;

    Ok(tracing_appender::non_blocking(appender))
}
