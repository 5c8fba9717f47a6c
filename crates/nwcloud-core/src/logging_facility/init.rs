//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output on stderr
    Development,
    /// JSON structured output on stderr
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

/// Target filter applied when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "nwcloud=info";

static INIT_ONCE: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for `profile`
///
/// Only the first call has an effect, and an already installed subscriber
/// (e.g. test capture) is left in place. Output goes to stderr so stdout
/// stays machine-readable for `status --json`.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
        // events are collected by init_test_capture() instead
        Profile::Test => {
            tracing_subscriber::registry().try_init().ok();
        }
    });
}
