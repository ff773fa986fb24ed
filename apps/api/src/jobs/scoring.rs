//! Match scoring: ranks canonical jobs against a candidate profile.
//!
//! Score = skills (0–40) + experience (0–30) + recency (0–20) + salary (0–10),
//! rounded to two decimals. Every sub-score is a pure function of the job, the
//! profile and the supplied `now`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::jobs::models::{CandidateProfile, CanonicalJob, ScoreBreakdown, ScoredJob, SkillMatchMode};

const SKILL_POINTS: f64 = 40.0;
const EXPERIENCE_POINTS: f64 = 30.0;
const RECENCY_POINTS: f64 = 20.0;
const SALARY_POINTS: f64 = 10.0;

/// Recency loses one point per this many days.
const RECENCY_DAYS_PER_POINT: f64 = 10.0;
/// `salary_max` must exceed this to earn the salary points.
const SALARY_SIGNAL_THRESHOLD: i64 = 50_000;
/// Experience requirements are searched in `0..MAX_SCANNED_YEARS`.
const MAX_SCANNED_YEARS: u32 = 20;

/// Scores every job and returns them best-first. Equal scores keep input order.
pub fn score_jobs(
    jobs: &[CanonicalJob],
    profile: &CandidateProfile,
    mode: SkillMatchMode,
    now: DateTime<Utc>,
) -> Vec<ScoredJob> {
    let skills: Vec<String> = profile.skills.iter().map(|s| s.to_lowercase()).collect();

    let mut scored: Vec<ScoredJob> = jobs
        .iter()
        .map(|job| score_job(job, &skills, profile.experience_years, mode, now))
        .collect();

    // `sort_by` is stable, which is what keeps tied jobs in input order.
    scored.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });

    scored
}

fn score_job(
    job: &CanonicalJob,
    skills: &[String],
    experience_years: u32,
    mode: SkillMatchMode,
    now: DateTime<Utc>,
) -> ScoredJob {
    let matching_skills = matching_skills(skills, &job.requirements, mode);

    let breakdown = ScoreBreakdown {
        skills: skill_score(matching_skills.len(), job.requirements.len()),
        experience: experience_score(experience_years, required_years(&job.description)),
        recency: recency_score(&job.posted_date, now),
        salary: salary_score(job.salary_max),
    };

    ScoredJob {
        job: job.clone(),
        match_score: round2(breakdown.total()),
        matching_skills,
        score_breakdown: breakdown,
    }
}

/// Lower-cased candidate skills that satisfy at least one requirement.
pub fn matching_skills(
    skills: &[String],
    requirements: &BTreeSet<String>,
    mode: SkillMatchMode,
) -> BTreeSet<String> {
    let requirements: Vec<String> = requirements.iter().map(|r| r.to_lowercase()).collect();
    skills
        .iter()
        .filter(|skill| requirements.iter().any(|req| mode.matches(skill, req)))
        .cloned()
        .collect()
}

/// Proportion of requirements covered, capped at the full 40 points.
///
/// With substring matching two candidate skills can hit the same tag
/// ("java" and "javascript" both hit "Javascript"), so the raw ratio may exceed 1.
pub fn skill_score(matched: usize, requirements: usize) -> f64 {
    if requirements == 0 {
        return 0.0;
    }
    let ratio = (matched as f64 / requirements as f64).min(1.0);
    SKILL_POINTS * ratio
}

/// First `n` in `0..20` for which the description mentions "n+", "n years" or
/// "n year". Zero when nothing matches.
pub fn required_years(description: &str) -> u32 {
    let description = description.to_lowercase();
    (0..MAX_SCANNED_YEARS)
        .find(|n| {
            description.contains(&format!("{n}+"))
                || description.contains(&format!("{n} years"))
                || description.contains(&format!("{n} year"))
        })
        .unwrap_or(0)
}

pub fn experience_score(experience_years: u32, required_years: u32) -> f64 {
    if required_years == 0 || experience_years >= required_years {
        return EXPERIENCE_POINTS;
    }
    (EXPERIENCE_POINTS * experience_years as f64 / required_years as f64).max(0.0)
}

/// Full points when the date can't be parsed; otherwise one point lost per ten days.
pub fn recency_score(posted_date: &str, now: DateTime<Utc>) -> f64 {
    match parse_posted_date(posted_date) {
        Some(posted) => {
            let days_old = (now - posted).num_days() as f64;
            (RECENCY_POINTS - days_old / RECENCY_DAYS_PER_POINT).clamp(0.0, RECENCY_POINTS)
        }
        None => RECENCY_POINTS,
    }
}

pub fn salary_score(salary_max: Option<i64>) -> f64 {
    match salary_max {
        Some(max) if max > SALARY_SIGNAL_THRESHOLD => SALARY_POINTS,
        _ => 0.0,
    }
}

/// Accepts RFC 3339, offset-less datetimes (read as UTC) and bare dates.
pub fn parse_posted_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
