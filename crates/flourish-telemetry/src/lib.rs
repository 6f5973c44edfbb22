//! Telemetry for Flourish
//!
//! Structured logging through the `tracing` ecosystem, as human-readable
//! lines or one JSON object per line.

use flourish_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// The filter comes from `RUST_LOG` when set, then `[telemetry] filter`,
/// then `default_filter`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let directive = filter_directive(config, default_filter);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{directive}': {e}, falling back to info");
        EnvFilter::new("info")
    });

    let format = config.map(|c| c.format).unwrap_or_default();
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::debug!(?format, "telemetry initialized");
    Ok(())
}

/// Pick the filter directive by precedence
fn filter_directive(config: Option<&TelemetryConfig>, default_filter: &str) -> String {
    if let Ok(from_env) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !from_env.trim().is_empty()
    {
        return from_env;
    }

    config
        .and_then(|c| c.filter.as_deref())
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(default_filter)
        .to_owned()
}
