//! Fallback keyword table
//!
//! Maps subcategories to the terms the rule-based classifier matches on.
//! Declaration order is the tie-break order when scores are equal. Keywords
//! are written against normalized text (lowercase, punctuation stripped), so
//! "self harm" here matches a submission containing "self-harm".

/// Keywords and patterns for one subcategory
#[derive(Debug)]
pub struct KeywordSet {
    pub subcategory: &'static str,
    /// Strong signals, weighted highest
    pub primary: &'static [&'static str],
    /// Weaker contextual signals
    pub secondary: &'static [&'static str],
    /// Regex patterns for phrasings plain substrings miss
    pub patterns: &'static [&'static str],
}

pub const FALLBACK_KEYWORDS: &[KeywordSet] = &[
    // Crisis categories first so equal scores resolve toward them
    KeywordSet {
        subcategory: "Suicidal Ideation",
        primary: &[
            "suicidal",
            "suicide",
            "kill myself",
            "end my life",
            "don t want to live",
        ],
        secondary: &["no point", "better off dead", "hopeless"],
        patterns: &[r"end (my )?life", r"don.?t want to (live|be here)"],
    },
    KeywordSet {
        subcategory: "Non-suicidal Self-injury",
        primary: &["self harm", "cutting", "self injury", "hurt myself"],
        secondary: &["razor", "blade", "scars", "burning myself"],
        patterns: &[r"hurt(ing)? myself", r"self.?(harm|injury)"],
    },
    KeywordSet {
        subcategory: "Anxiety & Panic",
        primary: &["anxiety", "anxious", "panic", "panic attack", "nervous"],
        secondary: &["heart racing", "can t breathe", "restless", "worried", "tense"],
        patterns: &[r"panic attack", r"heart (racing|pounding)"],
    },
    KeywordSet {
        subcategory: "Depression & Mood Swings",
        primary: &["depressed", "depression", "hopeless", "mood swings"],
        secondary: &["empty", "worthless", "no energy", "sad all the time"],
        patterns: &[r"feel (empty|worthless)", r"mood (swings|changes)"],
    },
    KeywordSet {
        subcategory: "Burnout & Exhaustion",
        primary: &["burnout", "burned out", "exhausted", "exhaustion", "drained"],
        secondary: &["overwhelmed", "can t cope", "overworked", "too much"],
        patterns: &[r"burn(ed|t) out", r"completely (exhausted|drained)"],
    },
    KeywordSet {
        subcategory: "Anger Management",
        primary: &["angry", "anger", "rage", "furious"],
        secondary: &["irritated", "temper", "explosive", "frustrated"],
        patterns: &[r"anger (issues|problems)", r"lose my temper"],
    },
    KeywordSet {
        subcategory: "Emotional Numbness",
        primary: &["numb", "numbness", "feel nothing", "emotionally numb"],
        secondary: &["disconnected", "void", "can t feel"],
        patterns: &[r"feel (nothing|numb)"],
    },
    KeywordSet {
        subcategory: "OCD & Intrusive Thoughts",
        primary: &["ocd", "obsessive", "compulsive", "intrusive thoughts"],
        secondary: &["checking", "counting", "unwanted thoughts"],
        patterns: &[r"intrusive thoughts", r"can.?t stop (checking|counting)"],
    },
    KeywordSet {
        subcategory: "Overthinking & Rumination",
        primary: &["overthinking", "rumination", "ruminating", "can t stop thinking"],
        secondary: &["replaying", "obsessing", "stuck in my head"],
        patterns: &[r"can.?t stop (thinking|analyzing)", r"stuck in (my head|a loop)"],
    },
    KeywordSet {
        subcategory: "Brain Fog & Memory Issues",
        primary: &["brain fog", "forgetful", "can t concentrate", "memory problems"],
        secondary: &["fuzzy", "unclear", "can t remember"],
        patterns: &[r"brain fog", r"can.?t (concentrate|focus|remember)"],
    },
    KeywordSet {
        subcategory: "ADHD (Focus, Impulsivity)",
        primary: &["adhd", "impulsive", "hyperactive"],
        secondary: &["distractible", "can t sit still", "hyperfocus"],
        patterns: &[r"attention (deficit|problems)"],
    },
    KeywordSet {
        subcategory: "Autism Spectrum (Masking, Sensory Overload)",
        primary: &["autism", "autistic", "masking", "sensory overload"],
        secondary: &["stimming", "meltdown", "overwhelming sounds"],
        patterns: &[r"sensory overload"],
    },
    KeywordSet {
        subcategory: "Self-esteem & Confidence",
        primary: &["self esteem", "confidence", "self worth", "insecure"],
        secondary: &["not good enough", "inadequate", "self doubt"],
        patterns: &[r"low (self.?esteem|confidence)", r"not good enough"],
    },
    KeywordSet {
        subcategory: "Perfectionism & Self-criticism",
        primary: &["perfectionist", "perfectionism", "self critical"],
        secondary: &["harsh on myself", "high standards", "never good enough"],
        patterns: &[r"never good enough", r"harsh on myself"],
    },
    KeywordSet {
        subcategory: "Coming Out",
        primary: &["coming out", "closeted"],
        secondary: &["scared to tell", "hiding who i am", "family reaction"],
        patterns: &[r"coming out", r"tell (my parents|my family)"],
    },
    KeywordSet {
        subcategory: "Gender Dysphoria",
        primary: &["gender dysphoria", "dysphoria", "wrong body"],
        secondary: &["transgender", "trans", "gender identity"],
        patterns: &[r"gender dysphoria", r"wrong body"],
    },
    KeywordSet {
        subcategory: "Exam Anxiety",
        primary: &["exam", "exams", "test anxiety", "finals"],
        secondary: &["studying", "grades", "failing"],
        patterns: &[r"(exam|test) (stress|anxiety|pressure)"],
    },
    KeywordSet {
        subcategory: "Toxic Work Environments",
        primary: &["toxic workplace", "toxic boss", "workplace bullying"],
        secondary: &["harassment", "hostile", "abusive boss"],
        patterns: &[r"toxic (work|workplace|boss)"],
    },
    KeywordSet {
        subcategory: "Job Insecurity",
        primary: &["job insecurity", "losing my job", "layoffs", "unemployment"],
        secondary: &["job hunting", "unemployed", "laid off"],
        patterns: &[r"los(e|ing) (my )?job", r"laid off"],
    },
    KeywordSet {
        subcategory: "Debt & Bills",
        primary: &["debt", "bills", "broke", "can t afford"],
        secondary: &["loans", "rent", "overdue", "money problems"],
        patterns: &[r"can.?t (pay|afford)", r"drowning in (debt|bills)"],
    },
    KeywordSet {
        subcategory: "Social Anxiety",
        primary: &["social anxiety", "afraid of people", "awkward around people"],
        secondary: &["avoid people", "crowds", "being judged"],
        patterns: &[r"social(ly)? (anxiety|anxious|awkward)"],
    },
    KeywordSet {
        subcategory: "No One to Talk To",
        primary: &["lonely", "loneliness", "no one to talk to", "alone"],
        secondary: &["isolated", "no friends", "by myself"],
        patterns: &[r"no (one|body) to talk to", r"all alone"],
    },
    KeywordSet {
        subcategory: "Death of a Loved One",
        primary: &["died", "death", "passed away", "funeral", "grief", "grieving"],
        secondary: &["loss", "mourning", "miss them"],
        patterns: &[r"passed away", r"lost my (mom|dad|mother|father|brother|sister|friend)"],
    },
    KeywordSet {
        subcategory: "Pet Loss",
        primary: &["pet died", "dog died", "cat died", "pet loss"],
        secondary: &["put down", "euthanized"],
        patterns: &[r"(dog|cat|pet) (died|passed)"],
    },
    KeywordSet {
        subcategory: "Separation & Divorce",
        primary: &["divorce", "divorced", "separation", "separated"],
        secondary: &["custody", "splitting up", "marriage ending"],
        patterns: &[r"getting (a )?divorce[d]?"],
    },
    KeywordSet {
        subcategory: "Childhood Trauma",
        primary: &["childhood trauma", "abusive parents", "abused as a child"],
        secondary: &["grew up", "my childhood", "traumatic"],
        patterns: &[r"(abuse[d]?|trauma) (as a|in my) child(hood)?"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::taxonomy::Taxonomy;

    #[test]
    fn test_every_keyword_subcategory_is_in_taxonomy() {
        let taxonomy = Taxonomy::builtin();

        for set in FALLBACK_KEYWORDS {
            assert!(
                taxonomy.resolve_subcategory(set.subcategory).is_some(),
                "keyword table references unknown subcategory '{}'",
                set.subcategory
            );
        }
    }

    #[test]
    fn test_patterns_compile() {
        for set in FALLBACK_KEYWORDS {
            for pattern in set.patterns {
                assert!(
                    regex::Regex::new(pattern).is_ok(),
                    "pattern '{}' for '{}' does not compile",
                    pattern,
                    set.subcategory
                );
            }
        }
    }

    #[test]
    fn test_crisis_categories_listed_first() {
        assert_eq!(FALLBACK_KEYWORDS[0].subcategory, "Suicidal Ideation");
        assert_eq!(FALLBACK_KEYWORDS[1].subcategory, "Non-suicidal Self-injury");
    }
}
