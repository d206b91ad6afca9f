use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::app_config::TelemetryConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter. Fails instead of panicking if a
/// subscriber is already installed.
pub fn init(config: &TelemetryConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.filter.as_str().into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
