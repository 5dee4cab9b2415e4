//! Logging and metrics setup shared by the Pachca webhook services.
//! Provides the subscriber bootstrap, the per-delivery span, and counters
//! recorded through the `metrics` facade.

mod config;
mod metrics;
mod tracing_init;

pub use config::{LogFormat, TelemetryConfig};
pub use metrics::{record_received, record_rejected, webhook_span, with_webhook_fields};
pub use tracing_init::init_telemetry;
