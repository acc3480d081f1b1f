//! Categorization request and result types

use serde::{Deserialize, Serialize};

use crate::domain::taxonomy::Category;
use crate::domain::DomainError;

/// Bounds on submitted struggle text. These mirror what the public API
/// advertises; anything outside them is rejected before the pipeline runs.
pub const MIN_TEXT_WORDS: usize = 3;
pub const MAX_TEXT_CHARS: usize = 2000;

/// Request priority. High-priority requests get a shorter remote timeout so
/// interactive callers fall back quickly instead of waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// A validated categorization request
///
/// Construction normalizes whitespace and enforces the text bounds; the
/// request is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizationRequest {
    text: String,
    session_id: Option<String>,
    priority: Priority,
}

impl CategorizationRequest {
    pub fn new(
        text: impl Into<String>,
        session_id: Option<String>,
        priority: Priority,
    ) -> Result<Self, DomainError> {
        let text: String = text.into();
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if cleaned.is_empty() {
            return Err(DomainError::invalid_input("Struggle text cannot be empty"));
        }

        if cleaned.split_whitespace().count() < MIN_TEXT_WORDS {
            return Err(DomainError::invalid_input(format!(
                "Struggle text must contain at least {} words",
                MIN_TEXT_WORDS
            )));
        }

        if cleaned.chars().count() > MAX_TEXT_CHARS {
            return Err(DomainError::invalid_input(format!(
                "Struggle text exceeds the {} character limit",
                MAX_TEXT_CHARS
            )));
        }

        Ok(Self {
            text: cleaned,
            session_id,
            priority,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Llm,
    Fallback,
    Cache,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Fallback => "fallback",
            Self::Cache => "cache",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category with its confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfidence {
    pub category: Category,
    pub confidence: f32,
}

impl CategoryConfidence {
    pub fn new(category: Category, confidence: f32) -> Self {
        Self {
            category,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// The outcome of one categorization
///
/// Categories are ordered by non-increasing confidence; the constructor
/// enforces the ordering so downstream code can rely on `categories[0]` being
/// the primary category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizationResult {
    pub categories: Vec<CategoryConfidence>,
    pub source: ResultSource,
    pub processing_time_ms: u64,
    /// Opaque room-matching payload owned by the backend; carried through
    /// the cache unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_rooms: Option<serde_json::Value>,
}

impl CategorizationResult {
    pub fn new(mut categories: Vec<CategoryConfidence>, source: ResultSource) -> Self {
        categories.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            categories,
            source,
            processing_time_ms: 0,
            suggested_rooms: None,
        }
    }

    pub fn with_processing_time(mut self, elapsed_ms: u64) -> Self {
        self.processing_time_ms = elapsed_ms;
        self
    }

    pub fn with_source(mut self, source: ResultSource) -> Self {
        self.source = source;
        self
    }

    /// Highest-confidence category, if any
    pub fn primary(&self) -> Option<&CategoryConfidence> {
        self.categories.first()
    }

    /// Mean confidence across returned categories
    pub fn overall_confidence(&self) -> f32 {
        if self.categories.is_empty() {
            return 0.0;
        }

        let total: f32 = self.categories.iter().map(|c| c.confidence).sum();
        total / self.categories.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_collapses_whitespace() {
        let request =
            CategorizationRequest::new("  I   feel\tanxious\n today ", None, Priority::Normal)
                .unwrap();
        assert_eq!(request.text(), "I feel anxious today");
    }

    #[test]
    fn test_request_rejects_empty() {
        let result = CategorizationRequest::new("   ", None, Priority::Normal);
        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
    }

    #[test]
    fn test_request_rejects_too_short() {
        let result = CategorizationRequest::new("help me", None, Priority::Normal);
        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
    }

    #[test]
    fn test_request_rejects_oversized() {
        let text = "word ".repeat(1000);
        let result = CategorizationRequest::new(text, None, Priority::Normal);
        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
    }

    #[test]
    fn test_result_orders_by_confidence() {
        let result = CategorizationResult::new(
            vec![
                CategoryConfidence::new(Category::new("A", "a"), 0.3),
                CategoryConfidence::new(Category::new("B", "b"), 0.9),
                CategoryConfidence::new(Category::new("C", "c"), 0.6),
            ],
            ResultSource::Llm,
        );

        let confidences: Vec<f32> = result.categories.iter().map(|c| c.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.6, 0.3]);
        assert_eq!(result.primary().unwrap().category.sub_id, "b");
    }

    #[test]
    fn test_confidence_clamped() {
        let entry = CategoryConfidence::new(Category::new("A", "a"), 1.7);
        assert_eq!(entry.confidence, 1.0);

        let entry = CategoryConfidence::new(Category::new("A", "a"), -0.2);
        assert_eq!(entry.confidence, 0.0);
    }

    #[test]
    fn test_overall_confidence() {
        let result = CategorizationResult::new(
            vec![
                CategoryConfidence::new(Category::new("A", "a"), 0.8),
                CategoryConfidence::new(Category::new("B", "b"), 0.4),
            ],
            ResultSource::Fallback,
        );
        assert!((result.overall_confidence() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_source_serialization() {
        assert_eq!(serde_json::to_string(&ResultSource::Llm).unwrap(), "\"llm\"");
        assert_eq!(
            serde_json::to_string(&ResultSource::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(
            serde_json::to_string(&ResultSource::Cache).unwrap(),
            "\"cache\""
        );
    }

    #[test]
    fn test_priority_default() {
        assert_eq!(Priority::default(), Priority::Normal);
        assert_eq!(
            serde_json::from_str::<Priority>("\"high\"").unwrap(),
            Priority::High
        );
    }
}
