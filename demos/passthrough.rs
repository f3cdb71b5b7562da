//! Forward `GET /v2/customers/products/` to a fixed backend path.

use api_gateway::lifecycle::Shutdown;
use api_gateway::{Gateway, HttpProxy, HttpServer, Target};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut gateway = Gateway::new();

    let target = Target::parse("http://127.0.0.1:8081/v1/customer-products/")?;
    gateway.handle("GET", "/v2/customers/products/", HttpProxy::passthrough(target))?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    HttpServer::new(gateway).run(listener, shutdown.subscribe()).await?;
    Ok(())
}
