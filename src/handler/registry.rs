//! Path-keyed registry for mounting handlers.

use crate::handler::fetch::{Handler, HandlerError, RequestContext};
use crate::http::{Request, Response};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

struct HandlerEntry {
    handler: Arc<dyn Handler>,
    context: RequestContext,
}

/// Registry mapping route paths to handlers.
///
/// Dispatch is an exact path match; handlers share the registry's global
/// environment through their [`RequestContext`].
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, HandlerEntry>>,
    global_env: HashMap<String, String>,
}

impl HandlerRegistry {
    /// Create a new handler registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            global_env: HashMap::new(),
        }
    }

    /// Create a new handler registry with global environment variables.
    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            global_env: env,
        }
    }

    /// Mount a handler at the given route path.
    pub async fn register(
        &self,
        route: impl Into<String>,
        handler: Box<dyn Handler>,
    ) -> Result<(), HandlerError> {
        let route = route.into();
        let mut handlers = self.handlers.write().await;

        if handlers.contains_key(&route) {
            return Err(HandlerError::new(format!(
                "a handler is already mounted at '{}'",
                route
            )));
        }

        let mut context = RequestContext::new(&route, "");
        for (key, value) in &self.global_env {
            context.env.insert(key.clone(), value.clone());
        }

        let name = handler.name().to_string();
        handlers.insert(
            route.clone(),
            HandlerEntry {
                handler: Arc::from(handler),
                context,
            },
        );
        info!("Mounted handler '{}' at {}", name, route);
        Ok(())
    }

    /// Dispatch a request to the handler mounted at the given path.
    pub async fn dispatch(
        &self,
        path: &str,
        request: Request,
        request_id: &str,
    ) -> Result<Response, HandlerError> {
        let (handler, mut context) = {
            let handlers = self.handlers.read().await;
            let entry = handlers.get(path).ok_or_else(|| {
                HandlerError::not_found(format!("no handler mounted at '{}'", path))
            })?;
            (entry.handler.clone(), entry.context.clone())
        };

        context.request_id = request_id.to_string();
        handler.fetch(request, &context).await
    }

    /// List the mounted routes with their handler names.
    pub async fn routes(&self) -> Vec<(String, String)> {
        let handlers = self.handlers.read().await;
        handlers
            .iter()
            .map(|(route, entry)| (route.clone(), entry.handler.name().to_string()))
            .collect()
    }

    /// Unmount the handler at the given route.
    pub async fn remove(&self, route: &str) -> Result<(), HandlerError> {
        let mut handlers = self.handlers.write().await;
        handlers
            .remove(route)
            .ok_or_else(|| HandlerError::not_found(format!("no handler mounted at '{}'", route)))?;

        info!("Unmounted handler at {}", route);
        Ok(())
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
