//! Log output setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the fmt subscriber. Filter comes from `LOG_LEVEL`, default `info`.
pub fn init_logging() {
    let filter = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
