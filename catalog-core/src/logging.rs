use std::{
    fs,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::Utc;
use tracing::Metadata;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::{config::LoggingConfig, error::AppError};

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`. Keep the returned guard alive
    /// until exit so buffered lines reach the file.
    ///
    /// Only a file layer is installed: the terminal belongs to the UI.
    pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard, AppError> {
        fs::create_dir_all(&config.log_dir)?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → <log_dir>/<prefix>.YYYY-MM-DD
        let file = rolling::daily(&config.log_dir, &config.file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(file);

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(Self::env_filter(&config.level)?);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .map_err(|e| AppError::Other(format!("logger already initialized: {e}")))?;

        Ok(guard)
    }

    fn env_filter(level: &str) -> Result<EnvFilter, AppError> {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        Self::filter_from(level, env.as_deref())
    }

    /// `RUST_LOG`, when set, wins; the configured level is only the default.
    fn filter_from(level: &str, env: Option<&str>) -> Result<EnvFilter, AppError> {
        let directive: Directive = level
            .parse()
            .map_err(|e| AppError::Other(format!("invalid log level '{level}': {e}")))?;

        Ok(match env.map(str::trim).filter(|e| !e.is_empty()) {
            Some(env) => EnvFilter::builder().parse_lossy(env),
            None => EnvFilter::builder()
                .with_default_directive(directive)
                .parse_lossy(""),
        })
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] TIME LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically‑increasing sequence number
        let seq: usize = SEQ
            .get_or_init(|| AtomicUsize::new(1))
            .fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {} {:5} [{}:{} {}] ",
            Utc::now().format("%H:%M:%S%.3f"),
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
