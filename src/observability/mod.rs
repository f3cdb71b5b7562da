//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxies and server produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (request and publish counters, latency histogram)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID is a field on every proxy log event
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
