//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build one proxy per route and register it on the gateway
//! - Share a single backend client and a single messaging client
//! - Bind the listener last (traffic only when ready)

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, GatewayConfig, ListenerConfig};
use crate::messaging::SnsPublisher;
use crate::proxy::{default_client, HttpProxy, Identity, PublishProxy, Target, TargetError};
use crate::routing::{Gateway, GatewayError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("route '{route}': {source}")]
    Target {
        route: String,
        #[source]
        source: TargetError,
    },

    #[error("route '{0}' has neither a target nor a topic")]
    Destination(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Build the gateway described by `config`.
///
/// The SNS client is only created when at least one route publishes.
pub async fn build_gateway(config: &GatewayConfig) -> Result<Gateway, StartupError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let client = default_client();
    let publisher = if config.has_publish_routes() {
        Some(SnsPublisher::from_config(&config.messaging).await)
    } else {
        None
    };
    let mut gateway = Gateway::new();

    for route in &config.routes {
        match (&route.target, &route.topic) {
            (Some(target), None) => {
                let target = Target::parse(target).map_err(|source| StartupError::Target {
                    route: route.name.clone(),
                    source,
                })?;
                tracing::info!(
                    route = %route.name,
                    method = %route.method,
                    path = %route.path,
                    target = %target,
                    "Passthrough route"
                );
                let proxy = HttpProxy::with_client(client.clone(), target, Identity, Identity);
                gateway.handle(&route.method, &route.path, proxy)?;
            }
            (None, Some(topic)) => {
                let Some(sns) = publisher.clone() else {
                    return Err(StartupError::Destination(route.name.clone()));
                };
                tracing::info!(
                    route = %route.name,
                    method = %route.method,
                    path = %route.path,
                    topic = %topic,
                    "Publish route"
                );
                gateway.handle(&route.method, &route.path, PublishProxy::passthrough(topic.clone(), sns))?;
            }
            _ => return Err(StartupError::Destination(route.name.clone())),
        }
    }

    Ok(gateway)
}

/// Bind the configured listener address.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address.clone(),
            source,
        })
}
