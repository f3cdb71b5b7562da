//! HTTP passthrough proxy bound to a single backend target.
//!
//! # Flow
//! ```text
//! inbound request
//!     → strip hop-by-hop headers, append X-Forwarded-For
//!     → Director (rewrite + request translator)
//!     → backend round trip (one attempt, transport timeouts only)
//!     → Interceptor (response translator)
//!     → caller
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response},
    response::IntoResponse,
};
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{
        connect::{Connect, HttpConnector},
        Client,
    },
    rt::TokioExecutor,
};

use crate::http::headers::{append_forwarded_for, strip_hop_by_hop};
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::proxy::director::Director;
use crate::proxy::error::ProxyError;
use crate::proxy::interceptor::Interceptor;
use crate::proxy::target::Target;
use crate::proxy::translator::{Identity, RequestTranslator, ResponseTranslator};

/// Connector of the default backend client: TLS for `https` targets, plain TCP for `http`.
pub type DefaultConnector = HttpsConnector<HttpConnector>;

/// Backend HTTP client used by passthrough proxies.
pub type HttpClient<C = DefaultConnector> = Client<C, Body>;

/// Build the default backend client, serving both `http` and `https` targets.
pub fn default_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpsConnector::new())
}

/// Forwarding unit composing a director, a backend client and an interceptor.
pub struct HttpProxy<C = DefaultConnector> {
    director: Director,
    interceptor: Interceptor,
    client: HttpClient<C>,
}

impl HttpProxy {
    /// Proxy with both translators.
    pub fn new(
        target: Target,
        response_translator: impl ResponseTranslator,
        request_translator: impl RequestTranslator,
    ) -> Self {
        Self::with_client(default_client(), target, response_translator, request_translator)
    }

    /// Forward requests to `target` without translation.
    pub fn passthrough(target: Target) -> Self {
        Self::new(target, Identity, Identity)
    }

    /// Rewrite requests before they are sent to `target`.
    pub fn with_request_translator(target: Target, translator: impl RequestTranslator) -> Self {
        Self::new(target, Identity, translator)
    }

    /// Rewrite backend responses before they are returned to callers.
    pub fn with_response_translator(target: Target, translator: impl ResponseTranslator) -> Self {
        Self::new(target, translator, Identity)
    }
}

impl<C> HttpProxy<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    /// Proxy using a caller-supplied client, e.g. one with a custom connector.
    pub fn with_client(
        client: HttpClient<C>,
        target: Target,
        response_translator: impl ResponseTranslator,
        request_translator: impl RequestTranslator,
    ) -> Self {
        Self {
            director: Director::new(target, Arc::new(request_translator)),
            interceptor: Interceptor::new(Arc::new(response_translator)),
            client,
        }
    }

    pub fn target(&self) -> &Target {
        self.director.target()
    }

    /// Handle one inbound request.
    pub async fn forward(&self, request: Request<Body>) -> axum::response::Response {
        let start_time = Instant::now();
        let request_id = request_id(request.headers()).to_string();
        let method = request.method().to_string();
        let target = self.target().authority().to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %request.uri().path(),
            target = %self.target(),
            "Proxying request"
        );

        match self.round_trip(request).await {
            Ok(response) => {
                metrics::record_request(&target, &method, response.status().as_u16(), start_time);
                response
            }
            Err(e) if e.is_transport_fault() => {
                tracing::warn!(request_id = %request_id, error = %e, "Aborting connection");
                metrics::record_aborted(&target, &method);
                e.into_response()
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, target = %self.target(), error = %e, "Proxy error");
                metrics::record_request(&target, &method, 502, start_time);
                e.into_response()
            }
        }
    }

    async fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let (mut parts, body) = request.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        if let Some(ip) = client_ip {
            append_forwarded_for(&mut parts.headers, ip);
        }

        let outbound = self.director.direct(Request::from_parts(parts, body)).await?;
        let response = self.client.request(outbound).await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        self.interceptor
            .intercept(Response::from_parts(parts, Body::new(body)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::request;
    use bytes::Bytes;
    use futures_util::stream;
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn unreadable_body() -> Body {
        Body::from_stream(stream::once(async {
            Err::<Bytes, std::io::Error>(std::io::Error::other("connection reset"))
        }))
    }

    #[test]
    fn test_unreadable_body_is_counted_as_aborted() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let target = Target::parse("http://127.0.0.1:1/y").unwrap();
        let proxy = HttpProxy::with_request_translator(target, |_: &mut request::Parts, body: Bytes| body);
        let request = Request::post("/x").body(unreadable_body()).unwrap();

        let response = ::metrics::with_local_recorder(&recorder, || runtime.block_on(proxy.forward(request)));
        let body = runtime.block_on(axum::body::to_bytes(response.into_body(), usize::MAX));
        assert!(body.is_err());

        let rendered = handle.render();
        assert!(rendered.contains("gateway_aborted_total"), "{rendered}");
        assert!(rendered.contains(r#"upstream="127.0.0.1:1""#), "{rendered}");
        assert!(!rendered.contains("gateway_requests_total"), "{rendered}");
    }
}
