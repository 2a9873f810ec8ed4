//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Crates whose events are shown at the profile's level; everything else is held at `warn`.
const OWN_CRATES: &[&str] = &[
    "helminspect_core",
    "helminspect_store",
    "helminspect_engine",
    "helm_inspect",
];

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output with debug level (`--verbose`)
    Development,
    /// Human-readable output with info level, no timestamps or targets
    Standard,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Build the default filter directive for the given level.
pub fn default_directive(level: &str) -> String {
    let mut directive = String::from("warn");
    for krate in OWN_CRATES {
        directive.push_str(&format!(",{krate}={level}"));
    }
    directive
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

/// Initialize the logging facility
///
/// This function should be called once at application startup.
/// `RUST_LOG` overrides the profile's default level.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Standard**: Compact human-readable logs with info level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Capture mode for test assertions
///
/// # Example
///
/// ```
/// use helminspect_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter("debug"))
                .init();
        }
        Profile::Standard => {
            tracing_subscriber::fmt()
                .without_time()
                .with_target(false)
                .with_env_filter(env_filter("info"))
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter("info"))
                .init();
        }
        Profile::Test => {
            // Test capture is initialized separately via init_test_capture()
            tracing_subscriber::registry().init();
        }
    });
}
