//! Canonical job records, filter criteria, candidate profiles and scored output.
//!
//! Every type here is value-like. Filtering and scoring take borrowed inputs and
//! hand back freshly allocated records.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_JOB_TYPE: &str = "full-time";

/// Source-independent job posting produced by a normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: String,
    pub description: String,
    pub job_type: String,
    /// ISO-8601; unparseable values count as unknown recency.
    pub posted_date: String,
    pub source: String,
    pub url: String,
    /// Derived from `description` at normalization time.
    pub requirements: BTreeSet<String>,
}

/// Optional, AND-composed constraints. An unset or empty field never excludes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub job_types: BTreeSet<String>,
    pub required_skills: BTreeSet<String>,
    pub location_keywords: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.min_salary.is_none()
            && self.max_salary.is_none()
            && self.job_types.is_empty()
            && self.required_skills.is_empty()
            && self.location_keywords.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
}

/// Points awarded per scoring dimension. `total()` is the unrounded match score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub recency: f64,
    pub salary: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.skills + self.experience + self.recency + self.salary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: CanonicalJob,
    /// 0 – 100, rounded to two decimals.
    pub match_score: f64,
    /// Lower-cased candidate skills that satisfy at least one requirement.
    pub matching_skills: BTreeSet<String>,
    pub score_breakdown: ScoreBreakdown,
}

/// How a candidate or filter skill is compared against a requirement tag.
///
/// `Substring` keeps the historical behavior where `"java"` also matches
/// `"Javascript"`. `Exact` requires case-insensitive equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchMode {
    #[default]
    Substring,
    Exact,
}

impl SkillMatchMode {
    /// Both arguments must already be lower-cased.
    pub fn matches(self, skill: &str, requirement: &str) -> bool {
        match self {
            SkillMatchMode::Substring => requirement.contains(skill),
            SkillMatchMode::Exact => requirement == skill,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillMatchMode::Substring => "substring",
            SkillMatchMode::Exact => "exact",
        }
    }
}

impl FromStr for SkillMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(SkillMatchMode::Substring),
            "exact" => Ok(SkillMatchMode::Exact),
            other => Err(format!("unknown skill match mode '{other}'")),
        }
    }
}
