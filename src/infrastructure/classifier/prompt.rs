//! Prompt construction for the remote classifier

use crate::domain::taxonomy::Taxonomy;

pub const SYSTEM_PROMPT: &str = "You are an expert mental health categorization assistant. \
     Analyze user struggles and categorize them accurately.";

/// Builds the categorization prompt for one submission.
///
/// The model is instructed to answer with bare JSON; the parser still
/// tolerates code fences and surrounding prose.
pub fn categorization_prompt(text: &str, taxonomy: &Taxonomy) -> String {
    let categories = taxonomy.subcategory_names().join(", ");

    format!(
        r#"Analyze the following user struggle and categorize it into the most appropriate categories from the provided list.

USER STRUGGLE:
"{text}"

AVAILABLE CATEGORIES:
{categories}

INSTRUCTIONS:
1. Select 1-3 most relevant categories from the available list
2. Assign confidence scores (0.0 to 1.0) for each selected category
3. Respond ONLY with valid JSON in this exact format:

{{
    "categories": [
        {{"category": "CategoryName", "confidence": 0.85}},
        {{"category": "AnotherCategory", "confidence": 0.72}}
    ]
}}

IMPORTANT:
- Use ONLY categories from the provided list
- Confidence scores must be between 0.0 and 1.0
- List categories from highest to lowest confidence
- Respond with valid JSON only, no additional text"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_text_and_categories() {
        let taxonomy = Taxonomy::builtin();
        let prompt = categorization_prompt("I feel anxious about exams", &taxonomy);

        assert!(prompt.contains("I feel anxious about exams"));
        assert!(prompt.contains("Anxiety & Panic"));
        assert!(prompt.contains("Exam Anxiety"));
        assert!(prompt.contains("valid JSON"));
    }
}
