//! Shared API types

pub mod categorize;
pub mod error;
pub mod json;

pub use categorize::{
    BulkCategorizeRequest, BulkCategorizeResponse, BulkItem, BulkItemError, CategorizeRequest,
    CategorizeResponse, CategoryEntry,
};
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
