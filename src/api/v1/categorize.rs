//! Categorization endpoints

use std::time::Instant;

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, BulkCategorizeRequest, BulkCategorizeResponse, BulkItem, BulkItemError,
    CategorizeRequest, CategorizeResponse, Json,
};

/// POST /v1/categorize
pub async fn categorize(
    State(state): State<AppState>,
    Json(body): Json<CategorizeRequest>,
) -> Result<Json<CategorizeResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let session_id = body.session_id.clone();
    let request = body.into_domain()?;

    let result = state.categorization.categorize(request).await?;

    info!(
        primary = result.primary().map(|c| c.category.sub_id.as_str()),
        source = %result.source,
        elapsed_ms = result.processing_time_ms,
        "Categorization completed"
    );

    let model = state.categorization.model_name();
    Ok(Json(CategorizeResponse::from_result(
        result, session_id, &model,
    )))
}

/// POST /v1/categorize/bulk
pub async fn categorize_bulk(
    State(state): State<AppState>,
    Json(body): Json<BulkCategorizeRequest>,
) -> Result<Json<BulkCategorizeResponse>, ApiError> {
    let start = Instant::now();

    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let batch_id = body
        .batch_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let model = state.categorization.model_name();

    let sessions: Vec<Option<String>> =
        body.requests.iter().map(|r| r.session_id.clone()).collect();

    let requests = body
        .requests
        .into_iter()
        .map(|r| r.into_domain())
        .collect::<Result<Vec<_>, _>>()?;

    let outcomes = state.categorization.categorize_bulk(requests).await?;

    let mut successful = 0usize;
    let mut failed = 0usize;

    let results: Vec<BulkItem> = outcomes
        .into_iter()
        .zip(sessions)
        .map(|(outcome, session_id)| match outcome {
            Ok(result) => {
                successful += 1;
                BulkItem::Success(Box::new(CategorizeResponse::from_result(
                    result, session_id, &model,
                )))
            }
            Err(e) => {
                failed += 1;
                BulkItem::Failure(BulkItemError::new(e.to_string()))
            }
        })
        .collect();

    info!(
        batch_id = %batch_id,
        successful,
        failed,
        "Bulk categorization completed"
    );

    Ok(Json(BulkCategorizeResponse {
        success: true,
        total_requests: successful + failed,
        successful_requests: successful,
        failed_requests: failed,
        results,
        batch_id,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}

/// One main category with its subcategories
#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub main_category: String,
    pub subcategories: Vec<String>,
}

/// GET /v1/categories response
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub version: String,
    pub total_main_categories: usize,
    pub total_subcategories: usize,
    pub categories: Vec<CategoryGroup>,
}

/// GET /v1/categories
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let taxonomy = &state.taxonomy;

    let categories = taxonomy
        .groups()
        .iter()
        .map(|(main, subs)| CategoryGroup {
            main_category: main.clone(),
            subcategories: subs.clone(),
        })
        .collect();

    Json(CategoriesResponse {
        version: taxonomy.version().to_string(),
        total_main_categories: taxonomy.main_category_count(),
        total_subcategories: taxonomy.subcategory_count(),
        categories,
    })
}

/// GET /v1/info response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub service_name: String,
    pub version: String,
    pub model: String,
    pub fallback_enabled: bool,
    pub remote_classifier_reachable: bool,
    pub timestamp: chrono::DateTime<Utc>,
}

/// GET /v1/info
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        service_name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.categorization.model_name(),
        fallback_enabled: state.categorization.fallback_enabled(),
        remote_classifier_reachable: state.categorization.last_remote_status(),
        timestamp: Utc::now(),
    })
}
