//! Proxying engine.
//!
//! # Data Flow
//! ```text
//! Passthrough route:
//!     request → director.rs (rewrite, request translator)
//!             → backend client
//!             → interceptor.rs (response translator)
//!             → caller
//!
//! Publish route:
//!     request → request translator → envelope.rs → messaging::Publisher
//!             → 202 Accepted | 502 Bad Gateway
//! ```
//!
//! # Design Decisions
//! - Proxies are immutable after construction and shared via `Arc`
//! - Translator faults are caught at the proxy boundary and become 502s
//! - An unreadable request body aborts the connection (`ProxyError::TransportFault`)

pub mod director;
pub mod envelope;
pub mod error;
pub mod interceptor;
pub mod passthrough;
pub mod publish;
pub mod target;
pub mod translator;

pub use director::{merge_query, Director};
pub use envelope::TopicEnvelope;
pub use error::ProxyError;
pub use interceptor::Interceptor;
pub use passthrough::{default_client, DefaultConnector, HttpClient, HttpProxy};
pub use publish::PublishProxy;
pub use target::{Target, TargetError};
pub use translator::{Identity, RequestTranslator, ResponseTranslator, TranslateError};
