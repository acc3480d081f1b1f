//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::domain::taxonomy::Taxonomy;
use crate::infrastructure::services::CategorizationServiceTrait;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub categorization: Arc<dyn CategorizationServiceTrait>,
    pub taxonomy: Arc<Taxonomy>,
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    pub fn new(
        categorization: Arc<dyn CategorizationServiceTrait>,
        taxonomy: Arc<Taxonomy>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            categorization,
            taxonomy,
            cache,
        }
    }
}
