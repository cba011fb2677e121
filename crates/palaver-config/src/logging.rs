use error_stack::{Result, ResultExt};
use serde::Deserialize;
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[error("Failed to initialize logging")]
pub struct InitError;

#[derive(Debug, Deserialize)]
pub struct Logging {
    /// Directive string for the env filter, e.g. `info,palaver_server=debug`.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of the human format.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

/// Installs the global subscriber. The error layer is always on so span
/// traces are available to error reports.
pub fn init(logging: &Logging) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(&logging.filter).change_context(InitError)?;
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .change_context(InitError)?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .change_context(InitError)?;
    }

    Ok(())
}
