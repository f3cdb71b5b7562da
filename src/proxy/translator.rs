//! Request and response translation hooks.
//!
//! # Responsibilities
//! - Let callers rewrite the outbound request after the director ran
//! - Let callers rewrite the backend response before it reaches the caller
//!
//! # Design Decisions
//! - Translators receive a fully buffered body and return the replacement body;
//!   the proxy derives `Content-Length` from the returned bytes, so body and
//!   length can never disagree
//! - `Identity` is the default translator; proxies skip buffering for it
//! - Plain closures implement both traits

use axum::http::{request, response};
use bytes::Bytes;
use thiserror::Error;

/// Failure reported by a response translator.
#[derive(Debug, Error)]
#[error("response translation failed: {message}")]
pub struct TranslateError {
    message: String,
}

impl TranslateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Rewrites an inbound request before it is forwarded or published.
pub trait RequestTranslator: Send + Sync + 'static {
    /// Mutate the request head in place and return the body to forward.
    fn translate_request(&self, parts: &mut request::Parts, body: Bytes) -> Bytes;

    /// Identity translators let the proxy stream the body untouched.
    fn is_identity(&self) -> bool {
        false
    }
}

/// Rewrites a backend response before it is returned to the caller.
pub trait ResponseTranslator: Send + Sync + 'static {
    /// Mutate the response head in place and return the body to send back.
    fn translate_response(
        &self,
        parts: &mut response::Parts,
        body: Bytes,
    ) -> Result<Bytes, TranslateError>;

    fn is_identity(&self) -> bool {
        false
    }
}

/// No-op translator used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl RequestTranslator for Identity {
    fn translate_request(&self, _parts: &mut request::Parts, body: Bytes) -> Bytes {
        body
    }

    fn is_identity(&self) -> bool {
        true
    }
}

impl ResponseTranslator for Identity {
    fn translate_response(
        &self,
        _parts: &mut response::Parts,
        body: Bytes,
    ) -> Result<Bytes, TranslateError> {
        Ok(body)
    }

    fn is_identity(&self) -> bool {
        true
    }
}

impl<F> RequestTranslator for F
where
    F: Fn(&mut request::Parts, Bytes) -> Bytes + Send + Sync + 'static,
{
    fn translate_request(&self, parts: &mut request::Parts, body: Bytes) -> Bytes {
        self(parts, body)
    }
}

impl<F> ResponseTranslator for F
where
    F: Fn(&mut response::Parts, Bytes) -> Result<Bytes, TranslateError> + Send + Sync + 'static,
{
    fn translate_response(
        &self,
        parts: &mut response::Parts,
        body: Bytes,
    ) -> Result<Bytes, TranslateError> {
        self(parts, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, Response, StatusCode};

    #[test]
    fn test_identity_keeps_body() {
        let (mut parts, _) = Request::new(()).into_parts();
        let body = RequestTranslator::translate_request(&Identity, &mut parts, Bytes::from("same"));
        assert_eq!(body, "same");
        assert!(RequestTranslator::is_identity(&Identity));
        assert!(ResponseTranslator::is_identity(&Identity));
    }

    #[test]
    fn test_closure_translators() {
        let upper = |_: &mut request::Parts, body: Bytes| -> Bytes {
            Bytes::from(String::from_utf8_lossy(&body).to_uppercase())
        };
        let (mut parts, _) = Request::new(()).into_parts();
        assert_eq!(upper.translate_request(&mut parts, Bytes::from("abc")), "ABC");
        assert!(!RequestTranslator::is_identity(&upper));

        let fail = |_: &mut response::Parts, _: Bytes| -> Result<Bytes, TranslateError> {
            Err(TranslateError::new("merge failed"))
        };
        let (mut parts, _) = Response::new(()).into_parts();
        parts.status = StatusCode::OK;
        let err = fail.translate_response(&mut parts, Bytes::new()).unwrap_err();
        assert_eq!(err.message(), "merge failed");
    }
}
