//! Domain layer - Core business logic and entities

pub mod cache;
pub mod categorization;
pub mod classifier;
pub mod error;
pub mod taxonomy;

pub use cache::{normalize_text, Cache, CacheExt, Fingerprint};
pub use categorization::{
    CategorizationRequest, CategorizationResult, CategoryConfidence, Priority, ResultSource,
};
pub use classifier::{
    FallbackClassifier, RemoteClassifier, RemoteClassifierError, RetryPolicy,
};
pub use error::DomainError;
pub use taxonomy::{Category, Taxonomy, TAXONOMY_VERSION};
