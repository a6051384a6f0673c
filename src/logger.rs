//! Structured logging handles.
//!
//! A [`Logger`] owns a `tracing` dispatcher and is handed explicitly to the
//! handler adapters and the server, which run their work inside it. Nothing
//! here installs a global subscriber unless [`Logger::install`] is called.

use std::future::Future;
use tracing::instrument::{WithDispatch, WithSubscriber};
use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Level};
use tracing_subscriber::EnvFilter;

/// A cloneable, thread-safe logging handle.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// A logger writing to stdout at `level`, as JSON lines or as text.
    ///
    /// Directives in `RUST_LOG` take precedence over `level`.
    pub fn new(level: Level, json: bool) -> Self {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(level).into())
            .from_env_lossy();
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stdout);

        let dispatch = if json {
            Dispatch::new(builder.json().finish())
        } else {
            Dispatch::new(builder.finish())
        };

        Self { dispatch }
    }

    /// A logger configured from a level name, see [`parse_level`].
    pub fn from_level_name(level: &str, json: bool) -> Self {
        Self::new(parse_level(level), json)
    }

    /// A text logger with debug level enabled.
    pub fn dev() -> Self {
        Self::new(Level::DEBUG, false)
    }

    /// A logger that discards everything.
    pub fn nop() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Run `f` with this logger as the current dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger current whenever `fut` is polled.
    pub fn instrument<F: Future>(&self, fut: F) -> WithDispatch<F> {
        fut.with_subscriber(self.dispatch.clone())
    }

    /// Install this logger as the process-wide default.
    pub fn install(&self) -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::nop()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Parse a level name, case-insensitively.
///
/// Accepts `trace`, `debug`, `info`, `warn`/`warning` and `error`; anything
/// else, including the empty string, is `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let cases = [
            ("debug", Level::DEBUG),
            ("DEBUG", Level::DEBUG),
            ("info", Level::INFO),
            ("INFO", Level::INFO),
            ("warn", Level::WARN),
            ("WARNING", Level::WARN),
            ("warning", Level::WARN),
            ("error", Level::ERROR),
            ("ERROR", Level::ERROR),
            ("trace", Level::TRACE),
            ("unknown", Level::INFO),
            ("", Level::INFO),
        ];

        for (name, want) in cases {
            assert_eq!(parse_level(name), want, "level {name:?}");
        }
    }

    #[test]
    fn test_nop_logger_disables_events() {
        let logger = Logger::nop();
        let enabled = logger.in_scope(|| tracing::enabled!(Level::ERROR));
        assert!(!enabled);
    }

    #[test]
    fn test_level_filters_events() {
        let logger = Logger::new(Level::WARN, false);
        assert!(logger.in_scope(|| tracing::enabled!(Level::ERROR)));
        assert!(!logger.in_scope(|| tracing::enabled!(Level::DEBUG)));
    }
}
