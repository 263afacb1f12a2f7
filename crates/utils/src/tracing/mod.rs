use taskwright_core::TASKWRIGHT_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use ::tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter comes from `TASKWRIGHT_LOG`, then `RUST_LOG`, then the
/// verbosity count (`0` = info, `1` = debug, more = trace). Logs go to stderr
/// so task output on stdout stays clean.
pub fn init(verbosity: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env(TASKWRIGHT_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span for task execution with proper metadata
pub fn task_span(name: &str) -> Span {
    span!(Level::INFO, "task", task_name = %name)
}

/// Create a span for a group of tasks running side by side
pub fn group_span(group: &str, members: usize) -> Span {
    span!(Level::INFO, "concurrent", group = %group, members = %members)
}

/// Emit a structured event for task completion
pub fn task_completed(task_name: &str, duration_ms: u64, success: bool) {
    if success {
        info!(
            task_name = %task_name,
            duration_ms = %duration_ms,
            "task_completed"
        );
    } else {
        error!(
            task_name = %task_name,
            duration_ms = %duration_ms,
            "task_failed"
        );
    }
}

/// Emit a structured event for a task that did not need to run
pub fn task_skipped(task_name: &str, reason: &str) {
    debug!(
        task_name = %task_name,
        reason = %reason,
        "task_skipped"
    );
}
