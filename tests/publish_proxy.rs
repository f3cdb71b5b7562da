//! End-to-end tests for publish routes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, request, StatusCode},
    routing::post,
    Router,
};

use api_gateway::config::MessagingConfig;
use api_gateway::messaging::{MessageStructure, PublishError, PublishReceipt, Publisher};
use api_gateway::{Gateway, PublishProxy, SnsPublisher};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

mod common;

const TOPIC_ARN: &str = "arn:aws:sns::000000000000:api_gateway_topic";

const PUBLISH_RESPONSE: &str = r#"<PublishResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  <PublishResult>
    <MessageId>94f20ce6-13c5-43a0-9a9e-ca52d816e90b</MessageId>
  </PublishResult>
  <ResponseMetadata>
    <RequestId>f187a3c1-376f-11df-8963-01868b7c937a</RequestId>
  </ResponseMetadata>
</PublishResponse>"#;

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
            return Err(PublishError::rejected(topic, "topic does not exist"));
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), message, structure));
        Ok(PublishReceipt::default())
    }
}

/// Reports on drop whether the publish future it lives in was torn down.
struct DropSignal(mpsc::UnboundedSender<&'static str>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        let _ = self.0.send("dropped");
    }
}

/// Publisher whose calls never complete.
struct StalledPublisher {
    events: mpsc::UnboundedSender<&'static str>,
}

impl Publisher for StalledPublisher {
    async fn publish(
        &self,
        _topic: &str,
        _message: String,
        _structure: MessageStructure,
    ) -> Result<PublishReceipt, PublishError> {
        let _signal = DropSignal(self.events.clone());
        let _ = self.events.send("started");
        std::future::pending::<()>().await;
        Ok(PublishReceipt::default())
    }
}

async fn gateway_for<P: Publisher>(proxy: PublishProxy<P>) -> String {
    let mut gateway = Gateway::new();
    gateway.handle("POST", "/x", proxy).unwrap();
    let (addr, _shutdown) = common::start_gateway(gateway).await;
    format!("http://{addr}/x")
}

/// Mock SNS endpoint capturing the form-encoded Publish call.
async fn start_sns_endpoint() -> (String, Arc<Mutex<Option<String>>>) {
    let captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();

    let app = Router::new().route(
        "/",
        post(move |body: String| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(body);
                ([(header::CONTENT_TYPE, "text/xml")], PUBLISH_RESPONSE)
            }
        }),
    );
    let addr = common::start_backend(app).await;
    (addr.to_string(), captured)
}

fn sns_config(endpoint: String) -> MessagingConfig {
    MessagingConfig {
        region: Some("us-east-1".into()),
        endpoint: Some(endpoint),
        disable_ssl: true,
        access_key_id: Some("id".into()),
        secret_access_key: Some("key".into()),
        session_token: None,
    }
}

fn form_value(form: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(form.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn test_publish_accepted_with_envelope() {
    let publisher = RecordingPublisher::default();
    let url = gateway_for(PublishProxy::passthrough("orders", publisher.clone())).await;

    let res = common::client().post(url).body("payload").send().await.unwrap();

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let published = publisher.published.lock().unwrap();
    assert_eq!(
        *published,
        vec![(
            "orders".to_string(),
            r#"{"default":"payload"}"#.to_string(),
            MessageStructure::Json
        )]
    );
}

#[tokio::test]
async fn test_publish_failure_is_bad_gateway() {
    let publisher = RecordingPublisher {
        fail: true,
        ..Default::default()
    };
    let url = gateway_for(PublishProxy::passthrough("orders", publisher)).await;

    let res = common::client().post(url).body("payload").send().await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_publish_empty_body() {
    let publisher = RecordingPublisher::default();
    let url = gateway_for(PublishProxy::passthrough("orders", publisher.clone())).await;

    let res = common::client().post(url).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(publisher.published.lock().unwrap()[0].1, r#"{"default":""}"#);
}

#[tokio::test]
async fn test_sns_passthrough() {
    let (endpoint, captured) = start_sns_endpoint().await;
    let publisher = SnsPublisher::from_config(&sns_config(endpoint)).await;
    let url = gateway_for(PublishProxy::passthrough(TOPIC_ARN, publisher)).await;

    let res = common::client()
        .post(url)
        .header(header::CONTENT_TYPE, "application/json")
        .body("test_sns_sqs")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let form = captured.lock().unwrap().clone().expect("SNS endpoint was not called");
    assert_eq!(form_value(&form, "Action").as_deref(), Some("Publish"));
    assert_eq!(form_value(&form, "Message").as_deref(), Some(r#"{"default":"test_sns_sqs"}"#));
    assert_eq!(form_value(&form, "MessageStructure").as_deref(), Some("json"));
    assert_eq!(form_value(&form, "TopicArn").as_deref(), Some(TOPIC_ARN));
}

#[tokio::test]
async fn test_sns_request_translator() {
    let (endpoint, captured) = start_sns_endpoint().await;
    let publisher = SnsPublisher::from_config(&sns_config(endpoint)).await;

    let translator = |_: &mut request::Parts, body: Bytes| -> Bytes {
        assert_eq!(body, "test_sns_sqs");
        Bytes::from("changed_test_sns_sqs")
    };
    let proxy = PublishProxy::with_request_translator(TOPIC_ARN, publisher, translator);
    let url = gateway_for(proxy).await;

    let res = common::client().post(url).body("test_sns_sqs").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let form = captured.lock().unwrap().clone().expect("SNS endpoint was not called");
    assert_eq!(
        form_value(&form, "Message").as_deref(),
        Some(r#"{"default":"changed_test_sns_sqs"}"#)
    );
}

#[tokio::test]
async fn test_disconnect_cancels_in_flight_publish() {
    let (events, mut observed) = mpsc::unbounded_channel();
    let mut gateway = Gateway::new();
    gateway
        .handle("POST", "/x", PublishProxy::passthrough("orders", StalledPublisher { events }))
        .unwrap();
    let (addr, _shutdown) = common::start_gateway(gateway).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"POST /x HTTP/1.1\r\nhost: gateway\r\ncontent-length: 7\r\n\r\npayload")
        .await
        .unwrap();
    assert_eq!(observed.recv().await, Some("started"));

    drop(stream);
    let event = tokio::time::timeout(Duration::from_secs(5), observed.recv())
        .await
        .expect("publish kept running after the caller left");
    assert_eq!(event, Some("dropped"));
}
