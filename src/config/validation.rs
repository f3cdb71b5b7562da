//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, methods, paths and target URLs
//! - Detect duplicate routes and paths differing only in parameter names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::proxy::Target;
use crate::routing::gateway::{route_path, route_shape};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("unknown log level '{0}'")]
    LogLevel(String),

    #[error("route #{0} has an empty name")]
    EmptyName(usize),

    #[error("route '{route}': invalid method '{method}'")]
    Method { route: String, method: String },

    #[error("route '{route}': path '{path}' must start with '/'")]
    Path { route: String, path: String },

    #[error("route '{0}': exactly one of 'target' or 'topic' must be set")]
    Destination(String),

    #[error("route '{route}': {reason}")]
    Target { route: String, reason: String },

    #[error("route '{0}': topic must not be empty")]
    EmptyTopic(String),

    #[error("route '{route}': {method} {path} is defined more than once")]
    Duplicate {
        route: String,
        method: String,
        path: String,
    },

    #[error("route '{route}': path '{path}' conflicts with '{existing}' of route '{existing_route}'")]
    Conflict {
        route: String,
        path: String,
        existing_route: String,
        existing: String,
    },
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }

    let mut seen = HashSet::new();
    // parameter-erased shape → (route name, declared path, normalized path)
    let mut shapes: HashMap<String, (&str, &str, String)> = HashMap::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(index));
        }

        let method = route.method.trim().to_ascii_uppercase();
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::Method {
                route: route.name.clone(),
                method: route.method.clone(),
            });
        }

        if !route.path.starts_with('/') {
            errors.push(ValidationError::Path {
                route: route.name.clone(),
                path: route.path.clone(),
            });
        }

        match (&route.target, &route.topic) {
            (Some(target), None) => {
                if let Err(e) = Target::parse(target) {
                    errors.push(ValidationError::Target {
                        route: route.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            (None, Some(topic)) => {
                if topic.trim().is_empty() {
                    errors.push(ValidationError::EmptyTopic(route.name.clone()));
                }
            }
            _ => errors.push(ValidationError::Destination(route.name.clone())),
        }

        let normalized = route_path(&route.path).unwrap_or_else(|_| route.path.clone());
        match shapes.get(&route_shape(&normalized)) {
            Some((existing_route, existing, existing_normalized)) if *existing_normalized != normalized => {
                errors.push(ValidationError::Conflict {
                    route: route.name.clone(),
                    path: route.path.clone(),
                    existing_route: existing_route.to_string(),
                    existing: existing.to_string(),
                });
            }
            Some(_) => {}
            None => {
                let entry = (route.name.as_str(), route.path.as_str(), normalized.clone());
                shapes.insert(route_shape(&normalized), entry);
            }
        }

        if !seen.insert((method.clone(), normalized)) {
            errors.push(ValidationError::Duplicate {
                route: route.name.clone(),
                method,
                path: route.path.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
