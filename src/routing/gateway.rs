//! Gateway front door: binds method + path pairs to proxy instances.
//!
//! # Responsibilities
//! - Register proxies under a method and a path pattern
//! - Accept `:name` / `*name` parameters as well as axum's `{name}` syntax
//! - Reject duplicate and conflicting registrations instead of panicking
//! - Produce an axum `Router` for the HTTP server
//!
//! # Design Decisions
//! - Parameter extraction stays inside axum; proxies see the raw request
//! - Unknown paths fall through to 404, known paths with other methods to 405

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    routing::{MethodFilter, MethodRouter},
    Router,
};
use hyper_util::client::legacy::connect::Connect;
use thiserror::Error;

use crate::messaging::Publisher;
use crate::proxy::{HttpProxy, PublishProxy};

/// Errors raised while registering routes.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid method '{0}'")]
    InvalidMethod(String),

    #[error("invalid path '{0}': must start with '/'")]
    InvalidPath(String),

    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },

    #[error("route '{path}' conflicts with registered route '{existing}'")]
    ConflictingRoute { path: String, existing: String },
}

/// A forwarding unit the gateway can dispatch requests to.
pub trait Forward: Send + Sync + 'static {
    fn forward(&self, request: Request<Body>) -> impl Future<Output = Response> + Send;
}

impl<C> Forward for HttpProxy<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    fn forward(&self, request: Request<Body>) -> impl Future<Output = Response> + Send {
        HttpProxy::forward(self, request)
    }
}

impl<P: Publisher> Forward for PublishProxy<P> {
    fn forward(&self, request: Request<Body>) -> impl Future<Output = Response> + Send {
        PublishProxy::forward(self, request)
    }
}

/// Method/path dispatch table over the proxies of one gateway.
#[derive(Default, Debug)]
pub struct Gateway {
    routes: BTreeMap<String, MethodRouter>,
    registered: HashSet<(Method, String)>,
    /// Parameter-erased path shape → the path registered under it.
    shapes: HashMap<String, String>,
}

impl Gateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `proxy` for requests matching `method` and `path`.
    pub fn handle<F: Forward>(&mut self, method: &str, path: &str, proxy: F) -> Result<(), GatewayError> {
        self.handle_shared(method, path, Arc::new(proxy))
    }

    /// Register a proxy that is already shared, e.g. across several routes.
    pub fn handle_shared<F: Forward>(
        &mut self,
        method: &str,
        path: &str,
        proxy: Arc<F>,
    ) -> Result<(), GatewayError> {
        let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| GatewayError::InvalidMethod(method.to_string()))?;
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| GatewayError::InvalidMethod(method.to_string()))?;
        let path = route_path(path)?;

        if let Some(existing) = self.shapes.get(&route_shape(&path)) {
            if *existing != path {
                return Err(GatewayError::ConflictingRoute {
                    path,
                    existing: existing.clone(),
                });
            }
        }
        if !self.registered.insert((method.clone(), path.clone())) {
            return Err(GatewayError::DuplicateRoute { method, path });
        }
        self.shapes.insert(route_shape(&path), path.clone());

        let handler = move |request: Request<Body>| {
            let proxy = proxy.clone();
            async move { proxy.forward(request).await }
        };

        let method_router = self.routes.remove(&path).unwrap_or_else(MethodRouter::new);
        self.routes.insert(path.clone(), method_router.on(filter, handler));

        tracing::debug!(method = %method, path = %path, "Route registered");
        Ok(())
    }

    /// Number of registered method + path pairs.
    pub fn route_count(&self) -> usize {
        self.registered.len()
    }

    pub fn into_router(self) -> Router {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| router.route(&path, method_router))
    }
}

/// Translate `:name` and `*name` segments into axum's `{name}` / `{*name}`.
pub fn route_path(path: &str) -> Result<String, GatewayError> {
    if !path.starts_with('/') {
        return Err(GatewayError::InvalidPath(path.to_string()));
    }

    let segments: Vec<String> = path
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{*{name}}}")
            } else {
                segment.to_string()
            }
        })
        .collect();

    Ok(segments.join("/"))
}

/// Erase parameter names from an axum path: `/orders/{code}` → `/orders/{}`.
///
/// Two distinct paths with the same shape cannot live in one router.
pub fn route_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with("{*") && segment.ends_with('}') {
                "{*}"
            } else if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
