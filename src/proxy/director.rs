//! Request director: rewrites an inbound request into a backend-bound one.
//!
//! # Responsibilities
//! - Point the request URI at the fixed target (scheme, authority, path)
//! - Merge target and inbound query strings
//! - Set `Host`, preserve the original host in `X-Forwarded-Host`
//! - Pin an empty `User-Agent` when the caller sent none
//! - Run the request translator last, so it can override all of the above
//!
//! # Design Decisions
//! - The target path replaces the inbound path; nothing is appended
//! - Query strings are concatenated, never de-duplicated
//! - Outbound requests are always HTTP/1.1

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, request, HeaderValue, Request, Uri, Version},
};

use crate::http::headers::{set_content_length, X_FORWARDED_HOST};
use crate::proxy::error::ProxyError;
use crate::proxy::target::Target;
use crate::proxy::translator::RequestTranslator;

/// Merge a target's base query with the inbound query.
///
/// The target query always comes first; an empty side contributes nothing.
pub fn merge_query(target: &str, inbound: &str) -> String {
    match (target.is_empty(), inbound.is_empty()) {
        (true, _) => inbound.to_string(),
        (false, true) => target.to_string(),
        (false, false) => format!("{target}&{inbound}"),
    }
}

/// Apply the structural rewrite for `target` to a request head.
pub fn rewrite(parts: &mut request::Parts, target: &Target) -> Result<(), ProxyError> {
    let original_host = parts.headers.get(header::HOST).cloned().or_else(|| {
        parts
            .uri
            .authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
    });

    let query = merge_query(target.query(), parts.uri.query().unwrap_or_default());
    let path_and_query = if query.is_empty() {
        target.path().to_string()
    } else {
        format!("{}?{}", target.path(), query)
    };

    parts.uri = Uri::builder()
        .scheme(target.scheme().clone())
        .authority(target.authority().clone())
        .path_and_query(path_and_query)
        .build()?;
    parts.version = Version::HTTP_11;

    let host = HeaderValue::from_str(target.authority().as_str()).map_err(axum::http::Error::from)?;
    parts.headers.insert(header::HOST, host);

    if let Some(original_host) = original_host {
        parts.headers.insert(X_FORWARDED_HOST, original_host);
    }

    if !parts.headers.contains_key(header::USER_AGENT) {
        parts.headers.insert(header::USER_AGENT, HeaderValue::from_static(""));
    }

    Ok(())
}

/// Run `translator` over a request, buffering the body unless it is the identity.
///
/// A body that cannot be read is a transport fault.
pub(crate) async fn translate_request(
    translator: &dyn RequestTranslator,
    parts: &mut request::Parts,
    body: Body,
) -> Result<Body, ProxyError> {
    if translator.is_identity() {
        return Ok(body);
    }

    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(ProxyError::TransportFault)?;
    let bytes = translator.translate_request(parts, bytes);
    set_content_length(&mut parts.headers, bytes.len());
    Ok(Body::from(bytes))
}

/// Fixed-target rewrite bound to an optional request translator.
pub struct Director {
    target: Target,
    translator: Arc<dyn RequestTranslator>,
}

impl Director {
    pub fn new(target: Target, translator: Arc<dyn RequestTranslator>) -> Self {
        Self { target, translator }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Produce the outbound request for `request`.
    pub async fn direct(&self, request: Request<Body>) -> Result<Request<Body>, ProxyError> {
        let (mut parts, body) = request.into_parts();
        rewrite(&mut parts, &self.target)?;
        let body = translate_request(self.translator.as_ref(), &mut parts, body).await?;
        Ok(Request::from_parts(parts, body))
    }
}
