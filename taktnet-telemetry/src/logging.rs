//! Structured logging with tracing.
//!
//! One `init` for the whole process; filtering follows `RUST_LOG` and
//! defaults to `info`.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_span_events(FmtSpan::ENTER)
            .init()
    }

    /// Log one firing at the given logical time.
    pub fn log_firing(transition: &str, time: f64) {
        tracing::info!(transition, time, "transition fired");
    }

    /// Log one clock advance.
    pub fn log_advance(step: f64, time: f64) {
        tracing::info!(step, time, "clock advanced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_firing_is_logged() {
        EventLogger::log_firing("send", 1.5);
        assert!(logs_contain("transition fired"));
    }

    #[traced_test]
    #[test]
    fn test_advance_is_logged() {
        EventLogger::log_advance(0.5, 2.0);
        assert!(logs_contain("clock advanced"));
    }
}
