//! HTTP types for hearth handlers providing a fetch-like API.

pub mod form;
mod request;
mod response;

pub use form::{extract_multipart_boundary, parse_form_data, FormData, FormDataError, FormField};
pub use request::{Method, Request};
pub use response::{Response, StatusCode};
