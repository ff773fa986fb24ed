//! Resume store: the document-store boundary handed to the HTTP layer.
//!
//! The matching engine never sees this trait; handlers load a `ResumeRow` and
//! pass its `CandidateProfile` into the engine.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, AppError>;
}

/// PostgreSQL-backed store over the `resumes` table.
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and wraps it.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL (max {max_connections} connections)...");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        debug!("Resume lookup {id}: found={}", row.is_some());
        Ok(row)
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use super::*;

    /// Map-backed store for handler and router tests.
    #[derive(Default)]
    pub struct InMemoryResumeStore {
        rows: HashMap<Uuid, ResumeRow>,
    }

    impl InMemoryResumeStore {
        pub fn with_rows(rows: Vec<ResumeRow>) -> Self {
            Self {
                rows: rows.into_iter().map(|r| (r.id, r)).collect(),
            }
        }
    }

    #[async_trait]
    impl ResumeStore for InMemoryResumeStore {
        async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, AppError> {
            Ok(self.rows.get(&id).cloned())
        }
    }
}
