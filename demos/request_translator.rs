//! Rename a payload field before the request reaches the backend.

use api_gateway::lifecycle::Shutdown;
use api_gateway::{Gateway, HttpProxy, HttpServer, Target};
use axum::http::request;
use bytes::Bytes;
use serde_json::Value;

fn rename_sku(_parts: &mut request::Parts, body: Bytes) -> Bytes {
    let Ok(mut payload) = serde_json::from_slice::<Value>(&body) else {
        return body;
    };
    if let Some(object) = payload.as_object_mut() {
        if let Some(sku) = object.remove("sku") {
            object.insert("product_sku".to_string(), sku);
        }
    }
    serde_json::to_vec(&payload).map(Bytes::from).unwrap_or(body)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut gateway = Gateway::new();

    let target = Target::parse("http://127.0.0.1:8081/v1/products/")?;
    gateway.handle(
        "POST",
        "/v2/products/",
        HttpProxy::with_request_translator(target, rename_sku),
    )?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    HttpServer::new(gateway).run(listener, shutdown.subscribe()).await?;
    Ok(())
}
