//! Tracing subscriber setup.
//!
//! The engine only emits `tracing` events; installing a subscriber is left
//! to the embedding driver. [`init`] installs the usual one: an `EnvFilter`
//! read from `RUST_LOG` with a fallback, and a compact fmt layer.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `default_filter` applies when `RUST_LOG`
/// is unset or invalid, e.g. `"inkrip=info,ink_dither=warn"`.
///
/// Fails if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call wins, only one global subscriber can exist
        let _ = init("inkrip=debug");
        assert!(init("inkrip=debug").is_err());
    }
}
