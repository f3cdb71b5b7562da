//! Messaging subsystem.
//!
//! # Data Flow
//! ```text
//! PublishProxy
//!     → Publisher::publish(topic, message, structure)
//!     → sns.rs (long-lived SNS client, shared by every publish route)
//!     → PublishReceipt | PublishError
//! ```
//!
//! # Design Decisions
//! - One client handle built at startup and cloned into each proxy
//! - Retries, signing and transport belong to the client, not the gateway
//! - Dropping the publish future cancels the attempt

pub mod sns;

use std::future::Future;

use thiserror::Error;

pub use sns::SnsPublisher;

/// How the messaging backend should interpret a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStructure {
    /// The message is a JSON envelope keyed by protocol, `default` being the fallback.
    Json,
}

impl MessageStructure {
    /// Wire value for the structure flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStructure::Json => "json",
        }
    }
}

/// Acknowledgement returned by the messaging backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

/// Errors reported by a publisher.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The messaging backend rejected the message or could not be reached.
    #[error("publish to '{topic}' failed: {reason}")]
    Rejected { topic: String, reason: String },
}

impl PublishError {
    pub fn rejected(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        PublishError::Rejected {
            topic: topic.into(),
            reason: reason.into(),
        }
    }
}

/// Asynchronous publish operation of a messaging client.
pub trait Publisher: Send + Sync + 'static {
    fn publish(
        &self,
        topic: &str,
        message: String,
        structure: MessageStructure,
    ) -> impl Future<Output = Result<PublishReceipt, PublishError>> + Send;
}
