//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RouteConfig[] / Gateway::handle(method, path, proxy)
//!     → gateway.rs (translate path syntax, reject duplicates and conflicts)
//!     → Freeze as immutable axum Router
//!
//! Per request:
//!     (method, path) → matched proxy | 404 | 405
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Each route is exactly one passthrough or publish proxy

pub mod gateway;

pub use gateway::{Forward, Gateway, GatewayError};
