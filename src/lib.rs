//! Lightweight API gateway library.
//!
//! Routes are bound either to an [`HttpProxy`], which rewrites the request for
//! a fixed backend target and optionally translates request and response, or
//! to a [`PublishProxy`], which wraps the request body in a topic envelope and
//! publishes it instead of calling a backend.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod messaging;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use messaging::{Publisher, SnsPublisher};
pub use proxy::{HttpProxy, PublishProxy, Target};
pub use routing::Gateway;
