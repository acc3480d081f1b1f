//! Static category taxonomy
//!
//! Two-level hierarchy of main categories and subcategories, built once at
//! startup and shared read-only. The remote classifier names subcategories;
//! the registry resolves them back to their main category and rejects
//! anything it does not know about.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Bumped whenever the category table changes so cached results from an older
/// taxonomy are never served against a newer one.
pub const TAXONOMY_VERSION: &str = "2";

/// A validated reference into the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub main_id: String,
    pub sub_id: String,
}

impl Category {
    pub fn new(main_id: impl Into<String>, sub_id: impl Into<String>) -> Self {
        Self {
            main_id: main_id.into(),
            sub_id: sub_id.into(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.main_id, self.sub_id)
    }
}

/// Immutable category registry
///
/// Groups keep their declaration order; subcategory lookups are O(1) through
/// an index keyed by subcategory name.
#[derive(Debug)]
pub struct Taxonomy {
    version: String,
    groups: Vec<(String, Vec<String>)>,
    sub_index: HashMap<String, usize>,
    default_category: Category,
}

impl Taxonomy {
    /// Builds a taxonomy from ordered `(main, subcategories)` groups.
    ///
    /// Subcategory names must be unique across the whole table and the
    /// default category must itself be part of it.
    pub fn new(
        version: impl Into<String>,
        groups: Vec<(String, Vec<String>)>,
        default_category: Category,
    ) -> Result<Self, DomainError> {
        let mut sub_index = HashMap::new();

        for (idx, (main, subs)) in groups.iter().enumerate() {
            if subs.is_empty() {
                return Err(DomainError::validation(format!(
                    "Main category '{}' has no subcategories",
                    main
                )));
            }

            for sub in subs {
                if sub_index.insert(sub.clone(), idx).is_some() {
                    return Err(DomainError::validation(format!(
                        "Duplicate subcategory '{}' in taxonomy",
                        sub
                    )));
                }
            }
        }

        let taxonomy = Self {
            version: version.into(),
            groups,
            sub_index,
            default_category,
        };

        if !taxonomy.validate(
            &taxonomy.default_category.main_id,
            &taxonomy.default_category.sub_id,
        ) {
            return Err(DomainError::validation(format!(
                "Default category '{}' is not part of the taxonomy",
                taxonomy.default_category
            )));
        }

        Ok(taxonomy)
    }

    /// The built-in PeerNest category table
    pub fn builtin() -> Self {
        let groups = BUILTIN_GROUPS
            .iter()
            .map(|(main, subs)| {
                (
                    (*main).to_string(),
                    subs.iter().map(|s| (*s).to_string()).collect(),
                )
            })
            .collect();

        Self::new(
            TAXONOMY_VERSION,
            groups,
            Category::new("General Support", "General Support"),
        )
        .expect("built-in taxonomy is well-formed")
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Checks that `sub_id` exists and belongs to `main_id`
    pub fn validate(&self, main_id: &str, sub_id: &str) -> bool {
        self.sub_index
            .get(sub_id)
            .map(|&idx| self.groups[idx].0 == main_id)
            .unwrap_or(false)
    }

    /// Resolves a bare subcategory name to a full category reference
    pub fn resolve_subcategory(&self, sub_id: &str) -> Option<Category> {
        self.sub_index
            .get(sub_id)
            .map(|&idx| Category::new(self.groups[idx].0.clone(), sub_id))
    }

    /// All categories in declaration order
    pub fn all_categories(&self) -> Vec<Category> {
        self.groups
            .iter()
            .flat_map(|(main, subs)| {
                subs.iter()
                    .map(|sub| Category::new(main.clone(), sub.clone()))
            })
            .collect()
    }

    /// All subcategory names in declaration order, for prompt construction
    pub fn subcategory_names(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|(_, subs)| subs.iter().map(String::as_str))
            .collect()
    }

    /// Ordered `(main, subcategories)` view of the hierarchy
    pub fn groups(&self) -> &[(String, Vec<String>)] {
        &self.groups
    }

    pub fn subcategories(&self, main_id: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(main, _)| main == main_id)
            .map(|(_, subs)| subs.as_slice())
    }

    /// Category assigned when nothing else matches
    pub fn default_category(&self) -> &Category {
        &self.default_category
    }

    pub fn main_category_count(&self) -> usize {
        self.groups.len()
    }

    pub fn subcategory_count(&self) -> usize {
        self.sub_index.len()
    }
}

/// PeerNest struggle categories. Users are matched on subcategories for more
/// precise support.
const BUILTIN_GROUPS: &[(&str, &[&str])] = &[
    (
        "Mental Health - Emotional Regulation",
        &[
            "Anxiety & Panic",
            "Depression & Mood Swings",
            "Burnout & Exhaustion",
            "Anger Management",
            "Emotional Numbness",
        ],
    ),
    (
        "Mental Health - Cognitive Struggles",
        &[
            "OCD & Intrusive Thoughts",
            "Dissociation & Spacing Out",
            "Overthinking & Rumination",
            "Brain Fog & Memory Issues",
            "Decision Fatigue",
        ],
    ),
    (
        "Neurodivergence",
        &[
            "ADHD (Focus, Impulsivity)",
            "Autism Spectrum (Masking, Sensory Overload)",
            "Executive Dysfunction",
            "Rejection Sensitivity",
            "Navigating Diagnosis or Self-Diagnosis",
        ],
    ),
    (
        "Identity & Self-worth",
        &[
            "Self-esteem & Confidence",
            "Body Image",
            "Perfectionism & Self-criticism",
            "Cultural & Personal Identity",
            "Acceptance & Self-love",
        ],
    ),
    (
        "LGBTQ+ Struggles",
        &[
            "Coming Out",
            "Gender Dysphoria",
            "Homophobic Family or Friends",
            "Gender Expression",
            "Questioning Identity",
        ],
    ),
    (
        "Friendship & Dating Struggles",
        &[
            "Trust Issues",
            "Jealousy & Insecurity",
            "Unhealthy Dynamics",
            "Ghosting & Rejection",
            "Pressure to Fit In",
        ],
    ),
    (
        "Marriage & Divorce",
        &[
            "Communication Breakdown",
            "Emotional Distance",
            "Separation & Divorce",
            "Infidelity",
            "Resentment & Forgiveness",
        ],
    ),
    (
        "Family Pressure or Estrangement",
        &[
            "Toxic Parenting",
            "Religious or Cultural Pressure",
            "Childhood Trauma",
            "Sibling Conflict",
            "Generational Trauma",
        ],
    ),
    (
        "Academic or School Stress",
        &[
            "Exam Anxiety",
            "Failing Exams",
            "Academic Pressure",
            "Bullying",
            "Balancing Social & School Life",
        ],
    ),
    (
        "Job or Work Burnout",
        &[
            "Toxic Work Environments",
            "Overworking",
            "Job Insecurity",
            "Career Confusion",
            "Poor Work-Life Balance",
        ],
    ),
    (
        "Financial Pressure",
        &[
            "Debt & Bills",
            "Job Loss",
            "Financial Dependence",
            "Budgeting Struggles",
            "Shame Around Money",
        ],
    ),
    (
        "Life Direction & Time Struggles",
        &[
            "Feeling Lost or Stuck",
            "Fear of Failure",
            "Lack of Motivation",
            "Time Management",
            "Existential Questions",
        ],
    ),
    (
        "Loneliness & Isolation",
        &[
            "Feeling Misunderstood",
            "Social Anxiety",
            "No One to Talk To",
            "Disconnected from Community",
            "Isolation Despite Being Around Others",
        ],
    ),
    (
        "Grief & Loss",
        &[
            "Death of a Loved One",
            "Pet Loss",
            "Delayed Grief",
            "Disenfranchised Grief",
            "Coping with Holidays & Anniversaries",
        ],
    ),
    (
        "Suicidal Thoughts & Self-harm",
        &[
            "Suicidal Ideation",
            "Non-suicidal Self-injury",
            "Safety Planning",
            "Coping Alternatives",
            "Talking About It",
        ],
    ),
    (
        "Struggling with Therapy or Support",
        &[
            "Fear of Vulnerability",
            "Not Connecting with Therapist",
            "Stigma About Getting Help",
            "Feeling Like It's Not Working",
            "Navigating First-Time Therapy",
        ],
    ),
    (
        "Chronic Illness",
        &[
            "Pain Management",
            "Medical Fatigue",
            "Navigating Diagnosis",
            "Body Changes & Acceptance",
            "Feeling Misunderstood by Others",
        ],
    ),
    (
        "Sexual Assault & Trauma",
        &[
            "Consent Violation",
            "Flashbacks & Triggers",
            "Shame & Guilt",
            "Trust Recovery",
            "Navigating Disclosure",
        ],
    ),
    (
        "Living with a Disability",
        &[
            "Accessibility Barriers",
            "Navigating Daily Tasks",
            "Feeling Overlooked or Excluded",
            "Ableism & Discrimination",
            "Emotional Impact of Disability",
        ],
    ),
    ("General Support", &["General Support"]),
];
