//! Handler trait and per-request context.

use crate::http::{FormDataError, Request, Response};
use async_trait::async_trait;
use std::collections::HashMap;

/// Execution context passed to handlers on each request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Environment variables available to the handler.
    pub env: HashMap<String, String>,
    /// Route path the handler is mounted at.
    pub route: String,
    /// Request ID for tracing.
    pub request_id: String,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(route: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            env: HashMap::new(),
            route: route.into(),
            request_id: request_id.into(),
        }
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Get an environment variable.
    pub fn get_env(&self, key: &str) -> Option<&String> {
        self.env.get(key)
    }
}

/// Trait for hearth request handlers.
///
/// A handler receives each incoming request exactly once and must produce a
/// response or an error. Body decoding failures are expected to be handled
/// inside `fetch` when the handler wants to keep serving (see the form-guard
/// pattern in the crate docs); an `Err` return becomes an error response but
/// never takes the server down.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle an incoming HTTP request (fetch event).
    async fn fetch(
        &self,
        request: Request,
        ctx: &RequestContext,
    ) -> Result<Response, HandlerError>;

    /// Get the handler name.
    fn name(&self) -> &str;
}

/// Handler error type.
#[derive(Debug, Clone)]
pub struct HandlerError {
    /// Error message.
    pub message: String,
    /// HTTP status code to respond with.
    pub code: u16,
}

impl HandlerError {
    /// Create a new HandlerError.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 500,
        }
    }

    /// Create a HandlerError with a specific code.
    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(404, message)
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(400, message)
    }

    /// Create a gateway timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::with_code(504, message)
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<HandlerError> for Response {
    fn from(err: HandlerError) -> Self {
        Response::error(err.code, err.message)
    }
}

impl From<FormDataError> for HandlerError {
    fn from(err: FormDataError) -> Self {
        HandlerError::with_code(415, err.to_string())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        HandlerError::new(err.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::bad_request(err.to_string())
    }
}
