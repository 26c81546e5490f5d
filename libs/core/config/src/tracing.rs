//! Subscriber setup for every binary in the workspace.

use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the color-eyre report hook. Call before anything fallible;
/// repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

fn default_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new("info,tower_http=info,mongodb=warn,lettre=warn")
        } else {
            EnvFilter::new("debug,tower_http=debug,mongodb=info,lettre=info")
        }
    })
}

/// Initialize the global subscriber.
///
/// Production (`APP_ENV=production`) logs flattened JSON lines; everything
/// else gets the pretty formatter. Both carry a `tracing_error::ErrorLayer`
/// so eyre reports include the active span trace (for example the
/// `batch_size` of a failed bulk stock call). `RUST_LOG` overrides the
/// default filter.
///
/// A second call is a no-op, which keeps tests that share a process happy.
pub fn init_tracing(environment: &Environment) {
    let filter = default_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized"),
    }
}
