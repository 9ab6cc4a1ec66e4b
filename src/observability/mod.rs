//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing, tenant and cache subsystems produce:
//!     → tracing events (structured logs)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (no-ops until an exporter is installed)
//! - Request ID flows through the HTTP layer via tower-http

pub mod logging;
pub mod metrics;
