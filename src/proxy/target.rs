//! Backend target addresses.
//!
//! A target is parsed once when a proxy is built and never changes afterwards.

use axum::http::uri::{Authority, Scheme};
use thiserror::Error;
use url::Url;

/// Errors raised while parsing a target URL.
#[derive(Debug, Error)]
pub enum TargetError {
    /// The string is not a valid absolute URL.
    #[error("invalid target url '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL has no host component (e.g. `mailto:`).
    #[error("target url '{0}' has no host")]
    MissingHost(String),

    /// Scheme or authority could not be expressed as an HTTP URI part.
    #[error("target url '{0}' is not a valid http uri")]
    InvalidUri(String),
}

/// An immutable backend address: scheme, authority, base path and base query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    scheme: Scheme,
    authority: Authority,
    path: String,
    query: String,
}

impl Target {
    /// Parse a target from an absolute URL such as `https://api.example.com/v1/orders?x=1`.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw).map_err(|source| TargetError::Parse {
            url: raw.to_string(),
            source,
        })?;
        Self::from_url(&url)
    }

    /// Build a target from an already parsed URL.
    pub fn from_url(url: &Url) -> Result<Self, TargetError> {
        let host = url
            .host_str()
            .ok_or_else(|| TargetError::MissingHost(url.to_string()))?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let scheme = url
            .scheme()
            .parse::<Scheme>()
            .map_err(|_| TargetError::InvalidUri(url.to_string()))?;
        let authority = authority
            .parse::<Authority>()
            .map_err(|_| TargetError::InvalidUri(url.to_string()))?;

        Ok(Self {
            scheme,
            authority,
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Host and optional port, as sent in the `Host` header.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base query string without the leading `?`; empty when absent.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
