//! Rule-based fallback classifier
//!
//! Deterministic keyword and pattern matcher used when the remote classifier
//! is unavailable or returns unusable output. Every returned category carries
//! the same fixed confidence, deliberately below anything a successful remote
//! classification produces, so consumers can tell the tiers apart by
//! confidence alone.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::categorization::CategoryConfidence;
use crate::domain::classifier::FallbackClassifier;
use crate::domain::taxonomy::{Category, Taxonomy};

use super::keywords::{KeywordSet, FALLBACK_KEYWORDS};

/// Patterns compiled once per process; the table itself is static
static COMPILED_PATTERNS: Lazy<Vec<Vec<Regex>>> = Lazy::new(|| {
    FALLBACK_KEYWORDS
        .iter()
        .map(|set| {
            set.patterns
                .iter()
                .filter_map(|p| match Regex::new(p) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        warn!("Invalid keyword pattern '{}': {}", p, e);
                        None
                    }
                })
                .collect()
        })
        .collect()
});

const PRIMARY_WEIGHT: f64 = 3.0;
const EXACT_WORD_BONUS: f64 = 1.0;
const SECONDARY_WEIGHT: f64 = 1.5;
const PATTERN_WEIGHT: f64 = 2.0;
const MULTI_MATCH_BONUS: f64 = 0.5;
const MAX_CATEGORIES: usize = 3;

/// One keyword set with its patterns compiled and its category resolved
#[derive(Debug)]
struct CompiledEntry {
    category: Category,
    primary: &'static [&'static str],
    secondary: &'static [&'static str],
    patterns: &'static [Regex],
}

/// Keyword-table classifier
#[derive(Debug)]
pub struct RuleBasedClassifier {
    entries: Vec<CompiledEntry>,
    default_category: Category,
    confidence: f32,
}

impl RuleBasedClassifier {
    /// Builds the classifier from the static keyword table.
    ///
    /// Table rows naming subcategories the taxonomy does not know are skipped
    /// (with a warning) so the taxonomy-closure invariant cannot be broken
    /// from here.
    pub fn new(taxonomy: Arc<Taxonomy>, confidence: f32) -> Self {
        let entries = FALLBACK_KEYWORDS
            .iter()
            .enumerate()
            .filter_map(|(idx, set)| Self::resolve_entry(&taxonomy, set, idx))
            .collect();

        Self {
            entries,
            default_category: taxonomy.default_category().clone(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    fn resolve_entry(
        taxonomy: &Taxonomy,
        set: &KeywordSet,
        table_index: usize,
    ) -> Option<CompiledEntry> {
        let Some(category) = taxonomy.resolve_subcategory(set.subcategory) else {
            warn!(
                "Keyword table references unknown subcategory '{}', skipping",
                set.subcategory
            );
            return None;
        };

        Some(CompiledEntry {
            category,
            primary: set.primary,
            secondary: set.secondary,
            patterns: &COMPILED_PATTERNS[table_index],
        })
    }

    /// Lowercases and strips punctuation so keyword matching is not defeated
    /// by casing or hyphenation.
    fn normalize(text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped: String = lowered
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn score_entry(entry: &CompiledEntry, normalized: &str) -> f64 {
        let padded = format!(" {} ", normalized);
        let mut score = 0.0;
        let mut primary_matches = 0;

        for keyword in entry.primary {
            if normalized.contains(keyword) {
                score += PRIMARY_WEIGHT;
                primary_matches += 1;

                if padded.contains(&format!(" {} ", keyword)) {
                    score += EXACT_WORD_BONUS;
                }
            }
        }

        for keyword in entry.secondary {
            if normalized.contains(keyword) {
                score += SECONDARY_WEIGHT;
            }
        }

        for pattern in entry.patterns {
            score += pattern.find_iter(normalized).count() as f64 * PATTERN_WEIGHT;
        }

        if primary_matches > 1 {
            score += primary_matches as f64 * MULTI_MATCH_BONUS;
        }

        score
    }
}

impl FallbackClassifier for RuleBasedClassifier {
    fn classify(&self, text: &str) -> Vec<CategoryConfidence> {
        let normalized = Self::normalize(text);

        let mut scored: Vec<(usize, f64)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let score = Self::score_entry(entry, &normalized);
                (score > 0.0).then_some((idx, score))
            })
            .collect();

        if scored.is_empty() {
            return vec![CategoryConfidence::new(
                self.default_category.clone(),
                self.confidence,
            )];
        }

        // Highest score first; equal scores fall back to table order
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        scored
            .into_iter()
            .take(MAX_CATEGORIES)
            .map(|(idx, _)| {
                CategoryConfidence::new(self.entries[idx].category.clone(), self.confidence)
            })
            .collect()
    }
}
