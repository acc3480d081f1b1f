//! Request/response DTOs for the categorization endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::categorization::{
    CategorizationRequest, CategorizationResult, Priority, ResultSource, MAX_TEXT_CHARS,
};
use crate::domain::DomainError;

/// Single categorization request body
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CategorizeRequest {
    #[validate(length(min = 1, max = 2000, message = "text must be 1-2000 characters"))]
    pub text: String,

    #[validate(length(max = 100, message = "session_id must be at most 100 characters"))]
    pub session_id: Option<String>,

    #[serde(default)]
    pub priority: Priority,
}

impl CategorizeRequest {
    pub fn into_domain(self) -> Result<CategorizationRequest, DomainError> {
        CategorizationRequest::new(self.text, self.session_id, self.priority)
    }
}

/// Bulk categorization request body
#[derive(Debug, Deserialize, Validate)]
pub struct BulkCategorizeRequest {
    #[validate(
        length(min = 1, max = 10, message = "requests must contain 1-10 items"),
        nested
    )]
    pub requests: Vec<CategorizeRequest>,

    pub batch_id: Option<String>,
}

/// One category with its resolved main category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub main_category: String,
    pub subcategory: String,
    pub confidence: f32,
}

/// Single categorization response body
#[derive(Debug, Clone, Serialize)]
pub struct CategorizeResponse {
    pub success: bool,
    pub categories: Vec<CategoryEntry>,
    pub primary_category: Option<String>,
    pub overall_confidence: f32,
    pub source: ResultSource,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_rooms: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    pub notes: Vec<String>,
}

impl CategorizeResponse {
    pub fn from_result(
        result: CategorizationResult,
        session_id: Option<String>,
        model: &str,
    ) -> Self {
        let notes = build_notes(&result, model);
        let primary_category = result.primary().map(|c| c.category.sub_id.clone());
        let overall_confidence = result.overall_confidence();

        let categories = result
            .categories
            .into_iter()
            .map(|entry| CategoryEntry {
                main_category: entry.category.main_id,
                subcategory: entry.category.sub_id,
                confidence: entry.confidence,
            })
            .collect();

        Self {
            success: true,
            categories,
            primary_category,
            overall_confidence,
            source: result.source,
            processing_time_ms: result.processing_time_ms,
            session_id,
            suggested_rooms: result.suggested_rooms,
            timestamp: Utc::now(),
            notes,
        }
    }
}

fn build_notes(result: &CategorizationResult, model: &str) -> Vec<String> {
    let mut notes = Vec::new();

    let confidence = result.overall_confidence();
    if confidence >= 0.8 {
        notes.push("High confidence categorization".to_string());
    } else if confidence >= 0.6 {
        notes.push("Moderate confidence categorization".to_string());
    } else {
        notes.push(
            "Low confidence categorization - consider providing more details".to_string(),
        );
    }

    if result.categories.len() > 1 {
        notes.push(format!(
            "Multiple categories detected ({} total)",
            result.categories.len()
        ));
    }

    match result.source {
        ResultSource::Llm => notes.push(format!("Powered by {}", model)),
        ResultSource::Fallback => {
            notes.push("Remote categorization unavailable, rule-based fallback used".to_string())
        }
        ResultSource::Cache => notes.push("Served from cache".to_string()),
    }

    notes
}

/// One entry of a bulk response: a full response or a per-item error
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BulkItem {
    Success(Box<CategorizeResponse>),
    Failure(BulkItemError),
}

#[derive(Debug, Serialize)]
pub struct BulkItemError {
    pub success: bool,
    pub error: String,
}

impl BulkItemError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Bulk categorization response body
#[derive(Debug, Serialize)]
pub struct BulkCategorizeResponse {
    pub success: bool,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub results: Vec<BulkItem>,
    pub batch_id: String,
    pub processing_time_ms: u64,
}

// Text length limits advertised here and enforced in the domain must agree
const _: () = assert!(MAX_TEXT_CHARS == 2000);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::categorization::CategoryConfidence;
    use crate::domain::taxonomy::Category;

    fn sample_result() -> CategorizationResult {
        CategorizationResult::new(
            vec![
                CategoryConfidence::new(
                    Category::new("Mental Health - Emotional Regulation", "Anxiety & Panic"),
                    0.9,
                ),
                CategoryConfidence::new(
                    Category::new("Academic or School Stress", "Exam Anxiety"),
                    0.7,
                ),
            ],
            ResultSource::Llm,
        )
        .with_processing_time(42)
    }

    #[test]
    fn test_request_validation() {
        let valid = CategorizeRequest {
            text: "I feel anxious about exams".to_string(),
            session_id: None,
            priority: Priority::Normal,
        };
        assert!(valid.validate().is_ok());

        let empty = CategorizeRequest {
            text: String::new(),
            session_id: None,
            priority: Priority::Normal,
        };
        assert!(empty.validate().is_err());

        let oversized = CategorizeRequest {
            text: "x".repeat(3000),
            session_id: None,
            priority: Priority::Normal,
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_bulk_request_validation() {
        let item = CategorizeRequest {
            text: "I feel anxious about exams".to_string(),
            session_id: None,
            priority: Priority::Normal,
        };

        let empty = BulkCategorizeRequest {
            requests: vec![],
            batch_id: None,
        };
        assert!(empty.validate().is_err());

        let oversized = BulkCategorizeRequest {
            requests: vec![item.clone(); 11],
            batch_id: None,
        };
        assert!(oversized.validate().is_err());

        let valid = BulkCategorizeRequest {
            requests: vec![item],
            batch_id: Some("batch-1".to_string()),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_response_from_result() {
        let response = CategorizeResponse::from_result(
            sample_result(),
            Some("sess_abc".to_string()),
            "llama3-70b-8192",
        );

        assert!(response.success);
        assert_eq!(response.primary_category, Some("Anxiety & Panic".to_string()));
        assert_eq!(response.categories.len(), 2);
        assert_eq!(
            response.categories[0].main_category,
            "Mental Health - Emotional Regulation"
        );
        assert_eq!(response.processing_time_ms, 42);
        assert!(response
            .notes
            .iter()
            .any(|n| n.contains("llama3-70b-8192")));
    }

    #[test]
    fn test_fallback_response_notes() {
        let result = CategorizationResult::new(
            vec![CategoryConfidence::new(
                Category::new("General Support", "General Support"),
                0.4,
            )],
            ResultSource::Fallback,
        );

        let response = CategorizeResponse::from_result(result, None, "llama3-70b-8192");
        assert!(response.notes.iter().any(|n| n.contains("fallback")));
        assert!(response.notes.iter().any(|n| n.contains("Low confidence")));
    }

    #[test]
    fn test_bulk_item_serialization() {
        let failure = BulkItem::Failure(BulkItemError::new("classifier failed"));
        let json = serde_json::to_string(&failure).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("classifier failed"));
    }
}
