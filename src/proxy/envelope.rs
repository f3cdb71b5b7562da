//! Topic envelope wrapping a request body for publication.

use std::borrow::Cow;

use serde::Serialize;

/// `{"default": "<body>"}`: the protocol-agnostic fallback payload of a
/// JSON-structured topic message.
#[derive(Debug, Serialize)]
pub struct TopicEnvelope<'a> {
    default: Cow<'a, str>,
}

impl<'a> TopicEnvelope<'a> {
    /// Wrap raw body bytes. Invalid UTF-8 sequences become U+FFFD so the
    /// envelope always serializes to valid JSON.
    pub fn new(body: &'a [u8]) -> Self {
        Self {
            default: String::from_utf8_lossy(body),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
