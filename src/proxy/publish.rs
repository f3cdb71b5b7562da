//! Publish proxy: turns a request into a topic message instead of a backend call.
//!
//! # Flow
//! ```text
//! inbound request
//!     → request translator (optional, may replace the body)
//!     → body read in full (failure aborts the connection)
//!     → {"default": "<body>"} envelope
//!     → Publisher::publish(topic, envelope, Json)
//!     → 202 Accepted | 502 Bad Gateway
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::messaging::{MessageStructure, PublishReceipt, Publisher};
use crate::observability::metrics;
use crate::proxy::director::translate_request;
use crate::proxy::envelope::TopicEnvelope;
use crate::proxy::error::ProxyError;
use crate::proxy::translator::{Identity, RequestTranslator};

/// Forwarding unit bound to one topic and one messaging client.
pub struct PublishProxy<P> {
    topic: String,
    publisher: P,
    translator: Arc<dyn RequestTranslator>,
}

impl<P: Publisher> PublishProxy<P> {
    pub fn new(topic: impl Into<String>, publisher: P, translator: impl RequestTranslator) -> Self {
        Self {
            topic: topic.into(),
            publisher,
            translator: Arc::new(translator),
        }
    }

    /// Publish request bodies unchanged.
    pub fn passthrough(topic: impl Into<String>, publisher: P) -> Self {
        Self::new(topic, publisher, Identity)
    }

    /// Publish the body produced by `translator`.
    pub fn with_request_translator(
        topic: impl Into<String>,
        publisher: P,
        translator: impl RequestTranslator,
    ) -> Self {
        Self::new(topic, publisher, translator)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Handle one inbound request.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let request_id = request_id(request.headers()).to_string();
        let method = request.method().to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            topic = %self.topic,
            "Publishing request"
        );

        match self.publish(request).await {
            Ok(receipt) => {
                tracing::debug!(
                    request_id = %request_id,
                    topic = %self.topic,
                    message_id = receipt.message_id.as_deref().unwrap_or("unknown"),
                    "Message published"
                );
                metrics::record_publish(&self.topic, "accepted");
                metrics::record_request(&self.topic, &method, StatusCode::ACCEPTED.as_u16(), start_time);
                StatusCode::ACCEPTED.into_response()
            }
            Err(e) if e.is_transport_fault() => {
                tracing::warn!(request_id = %request_id, topic = %self.topic, error = %e, "Aborting connection");
                metrics::record_publish(&self.topic, "aborted");
                metrics::record_aborted(&self.topic, &method);
                e.into_response()
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, topic = %self.topic, error = %e, "Publish failed");
                metrics::record_publish(&self.topic, "failed");
                metrics::record_request(&self.topic, &method, StatusCode::BAD_GATEWAY.as_u16(), start_time);
                e.into_response()
            }
        }
    }

    async fn publish(&self, request: Request<Body>) -> Result<PublishReceipt, ProxyError> {
        let (mut parts, body) = request.into_parts();
        let body = translate_request(self.translator.as_ref(), &mut parts, body).await?;
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::TransportFault)?;

        let message = TopicEnvelope::new(&body).to_json()?;
        let receipt = self
            .publisher
            .publish(&self.topic, message, MessageStructure::Json)
            .await?;
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::PublishError;
    use axum::http::request;
    use bytes::Bytes;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingPublisher {
        published: Arc<Mutex<Vec<(String, String, MessageStructure)>>>,
        fail: bool,
    }

    impl Publisher for RecordingPublisher {
        async fn publish(
            &self,
            topic: &str,
            message: String,
            structure: MessageStructure,
        ) -> Result<PublishReceipt, PublishError> {
            if self.fail {
                return Err(PublishError::rejected(topic, "unavailable"));
            }
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), message, structure));
            Ok(PublishReceipt {
                message_id: Some("m-1".into()),
            })
        }
    }

    fn post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/x")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_publish_accepted() {
        let publisher = RecordingPublisher::default();
        let proxy = PublishProxy::passthrough("orders", publisher.clone());

        let response = proxy.forward(post("payload")).await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "orders");
        assert_eq!(published[0].1, r#"{"default":"payload"}"#);
        assert_eq!(published[0].2, MessageStructure::Json);
    }

    #[tokio::test]
    async fn test_publish_translated_body() {
        let publisher = RecordingPublisher::default();
        let translator = |_: &mut request::Parts, body: Bytes| -> Bytes {
            assert_eq!(body, "test_sns_sqs");
            Bytes::from("changed_test_sns_sqs")
        };
        let proxy = PublishProxy::with_request_translator("orders", publisher.clone(), translator);

        let response = proxy.forward(post("test_sns_sqs")).await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let published = publisher.published.lock().unwrap();
        assert_eq!(published[0].1, r#"{"default":"changed_test_sns_sqs"}"#);
    }

    #[tokio::test]
    async fn test_publish_failure_is_bad_gateway() {
        let publisher = RecordingPublisher {
            fail: true,
            ..Default::default()
        };
        let proxy = PublishProxy::passthrough("orders", publisher);

        let response = proxy.forward(post("payload")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unreadable_body_aborts() {
        let publisher = RecordingPublisher::default();
        let proxy = PublishProxy::passthrough("orders", publisher.clone());

        let broken = Body::from_stream(futures_util::stream::once(async {
            Err::<Bytes, std::io::Error>(std::io::Error::other("connection reset"))
        }));
        let request = Request::builder().method("POST").uri("/x").body(broken).unwrap();

        let response = proxy.forward(request).await;
        assert!(axum::body::to_bytes(response.into_body(), usize::MAX).await.is_err());
        assert!(publisher.published.lock().unwrap().is_empty());
    }
}
