//! Shared API types: the error envelope and the JSON extractor

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
