//! Tracing subscriber bootstrap.
//!
//! Logs go to stderr so stdout only carries what the binaries print for humans.
//! `RUST_LOG` takes precedence over `telemetry.log_level`.

use anyhow::Context;
use docchat_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. A subscriber that is already installed is kept.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = select_filter(rust_log.as_deref(), &settings.log_level)?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!(target: "docchat-telemetry", "subscriber already installed");
    }

    Ok(())
}

/// `RUST_LOG` when set and non-empty, otherwise the configured level. A malformed
/// `RUST_LOG` is an error rather than a silent fallback.
fn select_filter(rust_log: Option<&str>, level: &str) -> anyhow::Result<EnvFilter> {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid RUST_LOG '{}'", directives)),
        _ => build_filter(level),
    }
}

fn build_filter(level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("invalid log level '{}'", level))
}
