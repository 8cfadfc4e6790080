//! Structured logging configuration.
//!
//! The library logs through the `log` facade; `init` installs a tracing
//! subscriber that also captures those records.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use sso_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    // `init` also installs the log -> tracing bridge
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// Never pass passwords or tokens in `message`.
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `subject` - Role-qualified identifier or principal id, if known
/// * `request_id` - Correlating request id, if known
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use sso_server::logging::log_security_event;
///
/// log_security_event(
///     "failed_login",
///     Some("waiter:bob"),
///     Some("6f1c3a7e-0d7b-4a51-9a53-1d8e0f6f2b11"),
///     "Invalid credentials",
/// );
/// ```
pub fn log_security_event(
    event_type: &str,
    subject: Option<&str>,
    request_id: Option<&str>,
    message: &str,
) {
    tracing::warn!(
        event_type = event_type,
        subject = subject,
        request_id = request_id,
        "SECURITY: {}",
        message
    );
}
