//! Subscriber installation shared by the wabtn binaries: env-filtered logs
//! (JSON unless `LOG_FORMAT` asks for text) plus optional OTLP span export.

use anyhow::Result;

mod config;
mod tracing_init;

pub use config::{DEFAULT_FILTER, OtlpProtocol, TelemetryConfig};
pub use tracing_init::{init_tracing, shutdown};

/// Installs the subscriber configured from the environment. Idempotent.
pub fn install(service_name: &str) -> Result<()> {
    init_tracing(&TelemetryConfig::from_env(
        service_name,
        env!("CARGO_PKG_VERSION"),
    ))
}
