use std::sync::Arc;

use crate::jobs::models::SkillMatchMode;
use crate::jobs::source::JobSource;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable job source. Default: `AdzunaClient`.
    pub job_source: Arc<dyn JobSource>,
    /// Document-store access for stored resume analyses. Default: `PgResumeStore`.
    pub resumes: Arc<dyn ResumeStore>,
    /// How filter and candidate skills are compared to requirement tags.
    pub skill_match_mode: SkillMatchMode,
}
