//! # Hearth - a small host runtime for fetch-style HTTP handlers
//!
//! Hearth runs lightweight "fetch-like" request handlers on top of hyper,
//! with a body-decoding layer built so that a request whose declared
//! content-type does not match its actual encoding can never crash the
//! server: decoding failures surface as ordinary `Result` values that the
//! handler recovers from locally.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hearth::prelude::*;
//!
//! // A handler that guards its body parsing: any decoding failure is
//! // caught locally and turned into a normal success response.
//! struct FormAction;
//!
//! #[async_trait::async_trait]
//! impl Handler for FormAction {
//!     async fn fetch(
//!         &self,
//!         request: Request,
//!         _ctx: &RequestContext,
//!     ) -> Result<Response, HandlerError> {
//!         let payload = match request.form_data() {
//!             Ok(_) => "pizza",
//!             Err(_) => "no pizza",
//!         };
//!         Ok(Response::json(&payload)?)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "form-action"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let server = Server::with_defaults();
//!     server.register("/", Box::new(FormAction)).await?;
//!     server.run().await
//! }
//! ```
//!
//! ## Body decoding
//!
//! [`http::Request::form_data`] decodes the body according to the declared
//! content-type. The urlencoded and multipart decoders are lenient (garbage
//! input yields an empty or partial form); only a non-form content-type is
//! an error. Exactly one response is produced per request either way.

pub mod handler;
pub mod http;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::handler::{Handler, HandlerError, HandlerRegistry, RequestContext};
    pub use crate::http::{FormData, FormDataError, Method, Request, Response, StatusCode};
    pub use crate::runtime::{Server, ServerConfig};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use handler::{Handler, HandlerError, HandlerRegistry, RequestContext};
pub use http::{FormData, FormDataError, Request, Response};
pub use runtime::{Server, ServerConfig};
