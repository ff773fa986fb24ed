mod config;
mod errors;
mod jobs;
mod models;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::source::{AdzunaClient, AdzunaCredentials, PageCache, SearchCache};
use crate::resumes::store::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Resume store (PostgreSQL)
    let resumes = PgResumeStore::connect(&config.database_url, config.database_max_connections).await?;

    // Job source (Adzuna), with an optional Redis page cache
    let cache: Option<Arc<dyn PageCache>> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            match SearchCache::connect(client, config.job_cache_ttl_secs).await {
                Ok(cache) => {
                    info!("Job search cache enabled (ttl {}s)", config.job_cache_ttl_secs);
                    Some(Arc::new(cache))
                }
                Err(e) => {
                    warn!("Redis unavailable ({e}), job search cache disabled");
                    None
                }
            }
        }
        None => {
            info!("REDIS_URL not set, job search cache disabled");
            None
        }
    };

    let credentials = match (&config.adzuna_app_id, &config.adzuna_app_key) {
        (Some(app_id), Some(app_key)) => Some(AdzunaCredentials {
            app_id: app_id.clone(),
            app_key: app_key.clone(),
        }),
        _ => {
            warn!("ADZUNA_APP_ID / ADZUNA_APP_KEY not set; job search will return 503");
            None
        }
    };

    let job_source = AdzunaClient::new(config.adzuna_base_url.clone(), credentials, cache)?;

    info!("Skill match mode: {}", config.skill_match_mode.as_str());

    // Build app state
    let state = AppState {
        job_source: Arc::new(job_source),
        resumes: Arc::new(resumes),
        skill_match_mode: config.skill_match_mode,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
