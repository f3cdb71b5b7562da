//! Response interception between the backend and the caller.

use std::sync::Arc;

use axum::{body::Body, http::Response};

use crate::http::headers::set_content_length;
use crate::proxy::error::ProxyError;
use crate::proxy::translator::ResponseTranslator;

/// Applies a response translator to backend responses.
///
/// With the identity translator the backend response streams through
/// untouched. Otherwise the body is buffered, translated on the request task,
/// and replaced together with its `Content-Length`.
pub struct Interceptor {
    translator: Arc<dyn ResponseTranslator>,
}

impl Interceptor {
    pub fn new(translator: Arc<dyn ResponseTranslator>) -> Self {
        Self { translator }
    }

    pub async fn intercept(&self, response: Response<Body>) -> Result<Response<Body>, ProxyError> {
        if self.translator.is_identity() {
            return Ok(response);
        }

        let (mut parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::UpstreamBody)?;
        let bytes = self.translator.translate_response(&mut parts, bytes)?;
        set_content_length(&mut parts.headers, bytes.len());

        Ok(Response::from_parts(parts, Body::from(bytes)))
    }
}
