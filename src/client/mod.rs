//! Backend HTTP Client
//!
//! Thin wrapper around `reqwest` configured with the backend base URL and a
//! JSON content type. Domain modules in [`crate::api`] build on top of it.

mod error;
mod http;

pub use error::{ClientError, ClientResult};
pub use http::{resource_path, ApiRequest, ApiResponse, HttpClient, QueryParams, DEFAULT_API_BASE};
