pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/v1/jobs/search", post(jobs::handle_search_jobs))
        .route("/api/v1/jobs/match-resume", post(jobs::handle_match_resume))
        .route("/api/v1/jobs/locations", get(jobs::handle_locations))
        // Resume API
        .route("/api/v1/resumes/:id", get(resumes::handle_get_resume))
        .with_state(state)
}
