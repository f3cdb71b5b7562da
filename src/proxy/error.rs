//! Proxy error taxonomy and its mapping onto HTTP responses.
//!
//! | Error            | Caller sees                    |
//! |------------------|--------------------------------|
//! | `TransportFault` | connection aborted, no response |
//! | `Rewrite`        | 502 Bad Gateway                |
//! | `Upstream`       | 502 Bad Gateway                |
//! | `UpstreamBody`   | 502 Bad Gateway                |
//! | `Translate`      | 502 Bad Gateway                |
//! | `Envelope`       | 502 Bad Gateway                |
//! | `Publish`        | 502 Bad Gateway                |

use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::messaging::PublishError;
use crate::proxy::translator::TranslateError;

/// Errors raised while forwarding a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The inbound request body could not be read. The connection is treated
    /// as compromised and torn down instead of answered.
    #[error("request body unreadable: {0}")]
    TransportFault(#[source] axum::Error),

    /// The outbound request could not be assembled from the target.
    #[error("failed to rewrite request: {0}")]
    Rewrite(#[from] axum::http::Error),

    /// The backend could not be reached.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The backend response body failed while being buffered for translation.
    #[error("upstream body unreadable: {0}")]
    UpstreamBody(#[source] axum::Error),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("failed to build topic envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl ProxyError {
    /// Status reported to the caller, `None` when the connection is aborted.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProxyError::TransportFault(_) => None,
            _ => Some(StatusCode::BAD_GATEWAY),
        }
    }

    pub fn is_transport_fault(&self) -> bool {
        matches!(self, ProxyError::TransportFault(_))
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self.status() {
            Some(status) => (status, status.canonical_reason().unwrap_or_default()).into_response(),
            None => aborted_response(),
        }
    }
}

/// A response whose body fails on first poll; hyper closes the connection
/// instead of completing the exchange.
fn aborted_response() -> Response {
    let body = Body::from_stream(futures_util::stream::once(async {
        Err::<Bytes, std::io::Error>(std::io::Error::new(
            std::io::ErrorKind::ConnectionAborted,
            "request handling aborted",
        ))
    }));
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .body(body)
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
