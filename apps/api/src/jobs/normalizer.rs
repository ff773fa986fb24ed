//! Job normalizers, one per upstream source, all converging on `CanonicalJob`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::jobs::models::{CanonicalJob, DEFAULT_CURRENCY, DEFAULT_JOB_TYPE};
use crate::jobs::requirements::extract_requirements;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("{source_name} job record is missing required field '{field}'")]
    MissingField {
        source_name: &'static str,
        field: &'static str,
    },
}

/// Maps one source's raw record shape into a `CanonicalJob`.
///
/// `now` stands in for a missing posting date, which keeps normalization
/// deterministic under test.
pub trait JobNormalizer {
    type Raw;

    fn source_name(&self) -> &'static str;

    fn normalize(&self, raw: Self::Raw, now: DateTime<Utc>) -> Result<CanonicalJob, NormalizeError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Adzuna
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdzunaDisplayName {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Adzuna sends ids as strings but older feeds use bare numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdzunaId {
    Text(String),
    Number(i64),
}

impl AdzunaId {
    fn into_string(self) -> String {
        match self {
            AdzunaId::Text(s) => s,
            AdzunaId::Number(n) => n.to_string(),
        }
    }
}

/// One entry of an Adzuna search response's `results` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdzunaJob {
    pub id: Option<AdzunaId>,
    pub title: Option<String>,
    pub company: Option<AdzunaDisplayName>,
    pub location: Option<AdzunaDisplayName>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub description: Option<String>,
    pub contract_type: Option<String>,
    pub created: Option<String>,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdzunaSearchResponse {
    #[serde(default)]
    pub results: Vec<AdzunaJob>,
}

pub struct AdzunaNormalizer;

impl JobNormalizer for AdzunaNormalizer {
    type Raw = AdzunaJob;

    fn source_name(&self) -> &'static str {
        "adzuna"
    }

    fn normalize(&self, raw: AdzunaJob, now: DateTime<Utc>) -> Result<CanonicalJob, NormalizeError> {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(NormalizeError::MissingField {
                source_name: self.source_name(),
                field: "title",
            })?;

        let description = raw.description.unwrap_or_default();
        let requirements = extract_requirements(&description);

        Ok(CanonicalJob {
            id: raw.id.map(AdzunaId::into_string).unwrap_or_default(),
            title,
            company: display_name(raw.company),
            location: display_name(raw.location),
            salary_min: raw.salary_min.and_then(whole_units),
            salary_max: raw.salary_max.and_then(whole_units),
            salary_currency: raw
                .salary_currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            description,
            job_type: raw
                .contract_type
                .unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string()),
            posted_date: raw
                .created
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            source: self.source_name().to_string(),
            url: raw.redirect_url.unwrap_or_default(),
            requirements,
        })
    }
}

fn display_name(field: Option<AdzunaDisplayName>) -> String {
    field.and_then(|f| f.display_name).unwrap_or_default()
}

/// Rounds a salary figure to whole currency units; non-finite values count as absent.
fn whole_units(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}
