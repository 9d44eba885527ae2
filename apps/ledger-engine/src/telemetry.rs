//! Tracing Setup
//!
//! Console logging via `tracing-subscriber`, filtered through `RUST_LOG`
//! (default `info`). A batch job has no collector to export spans to, so
//! there is no remote exporter here.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ledger_engine::telemetry::init_telemetry;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_telemetry();
//!     // ... application code
//! }
//! ```

use tracing_subscriber::EnvFilter;

/// Initialize console tracing.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
