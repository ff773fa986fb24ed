//! Requirement extraction: scans a job description for a fixed technology vocabulary.

use std::collections::BTreeSet;

/// Lower-case keywords recognized in job descriptions.
/// Matching is plain substring containment, so short entries like "go" and "ai"
/// also fire inside longer words.
const TECH_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "java",
    "c++",
    "c#",
    "ruby",
    "go",
    "rust",
    "react",
    "angular",
    "vue",
    "node",
    "django",
    "flask",
    "spring",
    "aws",
    "azure",
    "gcp",
    "kubernetes",
    "docker",
    "jenkins",
    "sql",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "machine learning",
    "ai",
    "deep learning",
    "nlp",
    "rest api",
    "graphql",
    "microservices",
    "devops",
    "git",
    "github",
    "gitlab",
    "agile",
    "scrum",
];

/// Returns the title-cased vocabulary terms found in `description`.
pub fn extract_requirements(description: &str) -> BTreeSet<String> {
    let description = description.to_lowercase();

    TECH_KEYWORDS
        .iter()
        .filter(|keyword| description.contains(*keyword))
        .map(|keyword| title_case(keyword))
        .collect()
}

/// Upper-cases the first letter of every alphabetic run: "c++" → "C++",
/// "rest api" → "Rest Api".
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
