//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, middleware, graceful shutdown)
//!     → request.rs (request ID)
//!     → routing::Gateway (method + path dispatch)
//!     → proxy (passthrough or publish)
//!     → headers.rs (hop-by-hop, X-Forwarded-*)
//!     → Send to client
//! ```

pub mod headers;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::HttpServer;
