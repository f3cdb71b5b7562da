//! Enrich an order payload before it is returned to the caller.

use api_gateway::lifecycle::Shutdown;
use api_gateway::proxy::TranslateError;
use api_gateway::{Gateway, HttpProxy, HttpServer, Target};
use axum::http::response;
use bytes::Bytes;
use serde_json::{json, Value};

fn merge_customer(_parts: &mut response::Parts, body: Bytes) -> Result<Bytes, TranslateError> {
    let mut order: Value =
        serde_json::from_slice(&body).map_err(|e| TranslateError::new(format!("order is not json: {e}")))?;

    order["customer"]["name"] = json!("John Doe");
    order["customer"]["country"] = json!("Brazil");

    serde_json::to_vec(&order)
        .map(Bytes::from)
        .map_err(|e| TranslateError::new(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut gateway = Gateway::new();

    let target = Target::parse("http://127.0.0.1:8081/v1/orders/")?;
    gateway.handle(
        "GET",
        "/v2/orders/:code",
        HttpProxy::with_response_translator(target, merge_customer),
    )?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    HttpServer::new(gateway).run(listener, shutdown.subscribe()).await?;
    Ok(())
}
