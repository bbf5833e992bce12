//! Handler module: the fetch trait, per-request context and path registry.

pub mod fetch;
pub mod registry;

pub use fetch::{Handler, HandlerError, RequestContext};
pub use registry::HandlerRegistry;
