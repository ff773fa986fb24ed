//! Filter engine: applies `FilterCriteria` to canonical jobs, preserving order.

use crate::jobs::models::{CanonicalJob, FilterCriteria, SkillMatchMode};

/// Returns the jobs that satisfy every active criterion, in input order.
///
/// Unset salary bounds on a job never exclude it (optimistic inclusion).
/// Required skills are ALL-of; location keywords are ANY-of.
pub fn filter_jobs(
    jobs: &[CanonicalJob],
    criteria: &FilterCriteria,
    mode: SkillMatchMode,
) -> Vec<CanonicalJob> {
    let job_types = lowercase_all(criteria.job_types.iter());
    let required_skills = lowercase_all(criteria.required_skills.iter());
    let location_keywords = lowercase_all(criteria.location_keywords.iter());

    jobs.iter()
        .filter(|job| passes_min_salary(job, criteria.min_salary))
        .filter(|job| passes_max_salary(job, criteria.max_salary))
        .filter(|job| job_types.is_empty() || job_types.contains(&job.job_type.to_lowercase()))
        .filter(|job| required_skills.is_empty() || has_all_skills(job, &required_skills, mode))
        .filter(|job| location_keywords.is_empty() || matches_any_location(job, &location_keywords))
        .cloned()
        .collect()
}

fn passes_min_salary(job: &CanonicalJob, min_salary: Option<i64>) -> bool {
    match (min_salary, job.salary_max) {
        (Some(min), Some(max)) => max >= min,
        _ => true,
    }
}

fn passes_max_salary(job: &CanonicalJob, max_salary: Option<i64>) -> bool {
    match (max_salary, job.salary_min) {
        (Some(max), Some(min)) => min <= max,
        _ => true,
    }
}

fn has_all_skills(job: &CanonicalJob, skills: &[String], mode: SkillMatchMode) -> bool {
    let requirements = lowercase_all(job.requirements.iter());
    skills
        .iter()
        .all(|skill| requirements.iter().any(|req| mode.matches(skill, req)))
}

fn matches_any_location(job: &CanonicalJob, keywords: &[String]) -> bool {
    let location = job.location.to_lowercase();
    keywords.iter().any(|kw| location.contains(kw.as_str()))
}

fn lowercase_all<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    items.map(|s| s.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn job(id: &str) -> CanonicalJob {
        CanonicalJob {
            id: id.to_string(),
            title: format!("Job {id}"),
            company: "Acme".to_string(),
            location: "Remote, US".to_string(),
            salary_min: None,
            salary_max: None,
            salary_currency: "USD".to_string(),
            description: String::new(),
            job_type: "full-time".to_string(),
            posted_date: "2024-01-01T00:00:00Z".to_string(),
            source: "adzuna".to_string(),
            url: String::new(),
            requirements: BTreeSet::new(),
        }
    }

    fn with_salary(mut j: CanonicalJob, min: Option<i64>, max: Option<i64>) -> CanonicalJob {
        j.salary_min = min;
        j.salary_max = max;
        j
    }

    fn with_requirements(mut j: CanonicalJob, reqs: &[&str]) -> CanonicalJob {
        j.requirements = set(reqs);
        j
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ids(jobs: &[CanonicalJob]) -> Vec<&str> {
        jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn test_unconstrained_criteria_is_identity() {
        let jobs = vec![
            with_salary(job("a"), Some(10), Some(20)),
            with_requirements(job("b"), &["Rust"]),
            job("c"),
        ];
        let out = filter_jobs(&jobs, &FilterCriteria::default(), SkillMatchMode::Substring);
        assert_eq!(out, jobs);
    }

    #[test]
    fn test_empty_input_returns_empty() {
        let criteria = FilterCriteria {
            min_salary: Some(1),
            ..FilterCriteria::default()
        };
        assert!(filter_jobs(&[], &criteria, SkillMatchMode::Substring).is_empty());
    }

    #[test]
    fn test_min_salary_keeps_unknown_upper_bound() {
        let jobs = vec![
            with_salary(job("unknown"), None, None),
            with_salary(job("low"), Some(30_000), Some(40_000)),
            with_salary(job("high"), Some(55_000), Some(70_000)),
            with_salary(job("exact"), None, Some(60_000)),
        ];
        let criteria = FilterCriteria {
            min_salary: Some(60_000),
            ..FilterCriteria::default()
        };
        let out = filter_jobs(&jobs, &criteria, SkillMatchMode::Substring);
        assert_eq!(ids(&out), vec!["unknown", "high", "exact"]);
    }

    #[test]
    fn test_max_salary_keeps_unknown_lower_bound() {
        let jobs = vec![
            with_salary(job("unknown"), None, Some(500_000)),
            with_salary(job("cheap"), Some(40_000), Some(50_000)),
            with_salary(job("pricey"), Some(200_000), None),
        ];
        let criteria = FilterCriteria {
            max_salary: Some(100_000),
            ..FilterCriteria::default()
        };
        let out = filter_jobs(&jobs, &criteria, SkillMatchMode::Substring);
        assert_eq!(ids(&out), vec!["unknown", "cheap"]);
    }

    #[test]
    fn test_job_type_is_case_insensitive() {
        let mut contract = job("contract");
        contract.job_type = "Contract".to_string();
        let jobs = vec![job("full"), contract];
        let criteria = FilterCriteria {
            job_types: set(&["CONTRACT"]),
            ..FilterCriteria::default()
        };
        let out = filter_jobs(&jobs, &criteria, SkillMatchMode::Substring);
        assert_eq!(ids(&out), vec!["contract"]);
    }

    #[test]
    fn test_required_skills_all_of() {
        let jobs = vec![
            with_requirements(job("go-only"), &["Go"]),
            with_requirements(job("both"), &["Go", "Kubernetes", "Docker"]),
        ];
        let criteria = FilterCriteria {
            required_skills: set(&["Go", "Kubernetes"]),
            ..FilterCriteria::default()
        };
        let out = filter_jobs(&jobs, &criteria, SkillMatchMode::Substring);
        assert_eq!(ids(&out), vec!["both"]);
    }

    #[test]
    fn test_required_skills_substring_vs_exact() {
        let jobs = vec![with_requirements(job("js"), &["Javascript"])];
        let criteria = FilterCriteria {
            required_skills: set(&["java"]),
            ..FilterCriteria::default()
        };
        assert_eq!(filter_jobs(&jobs, &criteria, SkillMatchMode::Substring).len(), 1);
        assert!(filter_jobs(&jobs, &criteria, SkillMatchMode::Exact).is_empty());
    }

    #[test]
    fn test_required_skills_exclude_job_without_requirements() {
        let jobs = vec![job("bare")];
        let criteria = FilterCriteria {
            required_skills: set(&["Rust"]),
            ..FilterCriteria::default()
        };
        assert!(filter_jobs(&jobs, &criteria, SkillMatchMode::Substring).is_empty());
    }

    #[test]
    fn test_location_keywords_any_of() {
        let mut nyc = job("nyc");
        nyc.location = "New York, NY".to_string();
        let mut berlin = job("berlin");
        berlin.location = "Berlin, Germany".to_string();
        let mut remote = job("remote");
        remote.location = "Remote".to_string();

        let criteria = FilterCriteria {
            location_keywords: set(&["new york", "REMOTE"]),
            ..FilterCriteria::default()
        };
        let out = filter_jobs(&[nyc, berlin, remote], &criteria, SkillMatchMode::Substring);
        assert_eq!(ids(&out), vec!["nyc", "remote"]);
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let mut good = with_requirements(with_salary(job("good"), None, Some(90_000)), &["Rust"]);
        good.location = "Austin, TX".to_string();
        let mut wrong_place = good.clone();
        wrong_place.id = "wrong-place".to_string();
        wrong_place.location = "London".to_string();
        let mut underpaid = good.clone();
        underpaid.id = "underpaid".to_string();
        underpaid.salary_max = Some(40_000);

        let criteria = FilterCriteria {
            min_salary: Some(50_000),
            required_skills: set(&["rust"]),
            location_keywords: set(&["tx"]),
            ..FilterCriteria::default()
        };
        let out = filter_jobs(&[good, wrong_place, underpaid], &criteria, SkillMatchMode::Substring);
        assert_eq!(ids(&out), vec!["good"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let jobs = vec![job("a"), job("b")];
        let before = jobs.clone();
        let criteria = FilterCriteria {
            location_keywords: set(&["nowhere"]),
            ..FilterCriteria::default()
        };
        let out = filter_jobs(&jobs, &criteria, SkillMatchMode::Substring);
        assert!(out.is_empty());
        assert_eq!(jobs, before);
    }
}
