//! Gateways assembled from configuration files.

use axum::{
    http::{StatusCode, Uri},
    routing::get,
    Router,
};

use api_gateway::config::parse_config;
use api_gateway::lifecycle::build_gateway;

mod common;

#[tokio::test]
async fn test_configured_routes_dispatch() {
    let app = Router::new()
        .route("/v1/customer-products/", get(|| async { "customer products" }))
        .route("/v1/orders/{code}", get(|uri: Uri| async move { uri.to_string() }));
    let backend = common::start_backend(app).await;

    let config = parse_config(&format!(
        r#"
        [listener]
        bind_address = "127.0.0.1:0"

        [[routes]]
        name = "customer-products"
        method = "GET"
        path = "/v2/customers/products/"
        target = "http://{backend}/v1/customer-products/"

        [[routes]]
        name = "orders"
        path = "/v2/orders/:code"
        target = "http://{backend}/v1/orders/fixed"
        "#
    ))
    .unwrap();

    let gateway = build_gateway(&config).await.unwrap();
    let (addr, shutdown) = common::start_gateway(gateway).await;
    let client = common::client();

    let res = client
        .get(format!("http://{addr}/v2/customers/products/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "customer products");

    // the target path replaces the inbound one, parameters are not substituted
    let res = client.get(format!("http://{addr}/v2/orders/42?v=1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "/v1/orders/fixed?v=1");

    let res = client.post(format!("http://{addr}/v2/orders/42")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = client.get(format!("http://{addr}/v3/unknown")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}
