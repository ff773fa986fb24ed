//! Axum route handlers for the Jobs API.

use std::collections::{BTreeMap, BTreeSet};

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::filter::filter_jobs;
use crate::jobs::models::{CanonicalJob, FilterCriteria, ScoredJob};
use crate::jobs::scoring::score_jobs;
use crate::jobs::source::{is_supported_location, JobQuery, SUPPORTED_LOCATIONS};
use crate::state::AppState;

const MAX_RESULTS_PER_PAGE: u32 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_location() -> String {
    "US".to_string()
}

fn default_results_per_page() -> u32 {
    10
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct JobSearchRequest {
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub min_salary: Option<i64>,
    #[serde(default)]
    pub max_salary: Option<i64>,
    #[serde(default)]
    pub job_types: Option<Vec<String>>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub location_keywords: Option<Vec<String>>,
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

impl JobSearchRequest {
    /// Blank entries are dropped so `[""]` means "no constraint" rather than
    /// "matches everything by substring". A salary bound of 0 is likewise unset.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_salary: self.min_salary.filter(|v| *v != 0),
            max_salary: self.max_salary.filter(|v| *v != 0),
            job_types: non_blank(self.job_types.as_deref()),
            required_skills: non_blank(self.required_skills.as_deref()),
            location_keywords: non_blank(self.location_keywords.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub resume_id: Uuid,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobSearchResponse {
    pub jobs: Vec<CanonicalJob>,
    pub total: usize,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobMatchResponse {
    pub candidate_name: String,
    pub candidate_skills: Vec<String>,
    pub candidate_experience_years: u32,
    pub jobs: Vec<ScoredJob>,
    pub total: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub locations: BTreeMap<&'static str, &'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/search
///
/// Fetches one page of postings and narrows it with the request's filters.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    payload: Result<Json<JobSearchRequest>, JsonRejection>,
) -> Result<Json<JobSearchResponse>, AppError> {
    let Json(request) = payload?;
    let query = build_query(
        &request.location,
        request.job_title.as_deref(),
        request.results_per_page,
        request.page,
    )?;

    let jobs = state.job_source.search(&query).await?;
    if jobs.is_empty() {
        return Ok(Json(JobSearchResponse {
            jobs: vec![],
            total: 0,
            message: "No jobs found matching your criteria".to_string(),
        }));
    }

    let criteria = request.criteria();
    let fetched = jobs.len();
    let filtered = if criteria.is_unconstrained() {
        jobs
    } else {
        filter_jobs(&jobs, &criteria, state.skill_match_mode)
    };
    info!("Found {} of {} jobs after filtering", filtered.len(), fetched);

    let total = filtered.len();
    Ok(Json(JobSearchResponse {
        jobs: filtered,
        total,
        message: format!("Found {total} relevant jobs"),
    }))
}

/// POST /api/v1/jobs/match-resume
///
/// Ranks one page of postings against a stored resume's skills and experience.
pub async fn handle_match_resume(
    State(state): State<AppState>,
    payload: Result<Json<JobMatchRequest>, JsonRejection>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let Json(request) = payload?;
    let query = build_query(
        &request.location,
        request.job_title.as_deref(),
        request.results_per_page,
        request.page,
    )?;

    let resume = state
        .resumes
        .get_resume(request.resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", request.resume_id)))?;
    let profile = resume.candidate_profile();

    info!(
        "Matching jobs for resume {} ({} skills, {} years experience)",
        resume.id,
        profile.skills.len(),
        profile.experience_years
    );

    let jobs = state.job_source.search(&query).await?;
    let candidate_skills: Vec<String> = profile.skills.iter().cloned().collect();

    if jobs.is_empty() {
        return Ok(Json(JobMatchResponse {
            candidate_name: resume.candidate_name,
            candidate_skills,
            candidate_experience_years: profile.experience_years,
            jobs: vec![],
            total: 0,
            message: "No jobs found".to_string(),
        }));
    }

    let ranked = score_jobs(&jobs, &profile, state.skill_match_mode, Utc::now());
    info!("Ranked {} jobs for resume {}", ranked.len(), resume.id);

    let total = ranked.len();
    Ok(Json(JobMatchResponse {
        candidate_name: resume.candidate_name,
        candidate_skills,
        candidate_experience_years: profile.experience_years,
        jobs: ranked,
        total,
        message: format!("Found {total} matching job opportunities"),
    }))
}

/// GET /api/v1/jobs/locations
pub async fn handle_locations() -> Json<LocationsResponse> {
    Json(LocationsResponse {
        locations: SUPPORTED_LOCATIONS.iter().copied().collect(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn build_query(
    location: &str,
    job_title: Option<&str>,
    results_per_page: u32,
    page: u32,
) -> Result<JobQuery, AppError> {
    let location = location.trim();
    if !is_supported_location(location) {
        return Err(AppError::Validation(format!(
            "location '{location}' is not a supported country code"
        )));
    }
    if !(1..=MAX_RESULTS_PER_PAGE).contains(&results_per_page) {
        return Err(AppError::Validation(format!(
            "results_per_page must be between 1 and {MAX_RESULTS_PER_PAGE}"
        )));
    }
    if page == 0 {
        return Err(AppError::Validation("page must be at least 1".to_string()));
    }

    Ok(JobQuery {
        location: location.to_uppercase(),
        job_title: job_title.unwrap_or_default().trim().to_string(),
        results_per_page,
        page,
    })
}

fn non_blank(items: Option<&[String]>) -> BTreeSet<String> {
    items
        .unwrap_or_default()
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
