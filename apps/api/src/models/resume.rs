use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::jobs::models::CandidateProfile;

/// A stored resume analysis. `analysis` is the full structured output of the
/// AI extraction step; the typed columns mirror the fields the matcher reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub filename: String,
    pub candidate_name: String,
    pub skills: Vec<String>,
    pub experience_years: i32,
    pub resume_quality_score: Option<i32>,
    pub summary: Option<String>,
    pub analysis: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Builds the matcher's view of this candidate. Negative stored
    /// experience is treated as none.
    pub fn candidate_profile(&self) -> CandidateProfile {
        CandidateProfile {
            skills: self
                .skills
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<_>>(),
            experience_years: u32::try_from(self.experience_years).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(skills: &[&str], years: i32) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            filename: "cv.pdf".to_string(),
            candidate_name: "Jordan Lee".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_years: years,
            resume_quality_score: Some(8),
            summary: None,
            analysis: json!({}),
            status: "analyzed".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_drops_blank_and_duplicate_skills() {
        let profile = row(&["Rust", " Rust ", "", "SQL"], 4).candidate_profile();
        assert_eq!(profile.skills.len(), 2);
        assert!(profile.skills.contains("Rust"));
        assert!(profile.skills.contains("SQL"));
        assert_eq!(profile.experience_years, 4);
    }

    #[test]
    fn test_negative_experience_clamps_to_zero() {
        assert_eq!(row(&[], -3).candidate_profile().experience_years, 0);
    }
}
