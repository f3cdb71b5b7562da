//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route definitions mapping method + path to a proxy.
    pub routes: Vec<RouteConfig>,

    /// Messaging client settings shared by all publish routes.
    pub messaging: MessagingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// True when at least one route publishes to a topic.
    pub fn has_publish_routes(&self) -> bool {
        self.routes.iter().any(|r| r.topic.is_some())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// A single gateway route. Exactly one of `target` or `topic` must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// HTTP method to match.
    #[serde(default = "default_method")]
    pub method: String,

    /// Path pattern; `:name` segments are parameters.
    pub path: String,

    /// Backend URL for passthrough routes.
    #[serde(default)]
    pub target: Option<String>,

    /// Topic identifier for publish routes.
    #[serde(default)]
    pub topic: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Messaging client configuration (SNS).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MessagingConfig {
    /// AWS region; falls back to the default provider chain when unset.
    pub region: Option<String>,

    /// Endpoint override, e.g. a local test double.
    pub endpoint: Option<String>,

    /// Use plain HTTP for a scheme-less endpoint override.
    pub disable_ssl: bool,

    /// Static credentials; both parts must be set to take effect.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl MessagingConfig {
    /// The endpoint override as a full URL, if one is configured.
    pub fn endpoint_url(&self) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?.trim();
        if endpoint.is_empty() {
            return None;
        }
        if endpoint.contains("://") {
            return Some(endpoint.to_string());
        }
        let scheme = if self.disable_ssl { "http" } else { "https" };
        Some(format!("{scheme}://{endpoint}"))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
