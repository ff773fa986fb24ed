//! Job sources: upstream job-search APIs behind a single trait.
//!
//! `AppState` holds an `Arc<dyn JobSource>`; the Adzuna client is the default
//! backend. Handlers never call an upstream API directly.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::jobs::models::CanonicalJob;
use crate::jobs::normalizer::{AdzunaNormalizer, AdzunaSearchResponse, JobNormalizer};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;

/// Adzuna country codes accepted by the search endpoint, with display names.
pub const SUPPORTED_LOCATIONS: &[(&str, &str)] = &[
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("AU", "Australia"),
    ("CA", "Canada"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("NL", "Netherlands"),
    ("IN", "India"),
    ("SG", "Singapore"),
];

pub fn is_supported_location(code: &str) -> bool {
    SUPPORTED_LOCATIONS
        .iter()
        .any(|(c, _)| c.eq_ignore_ascii_case(code))
}

/// One page of a job search.
#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    /// Country code, e.g. "US".
    pub location: String,
    /// Free-text title keywords; empty means "all".
    pub job_title: String,
    pub results_per_page: u32,
    pub page: u32,
}

#[derive(Debug, Error)]
pub enum JobSourceError {
    #[error("job source '{0}' is not configured")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("invalid upstream payload: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Name recorded as `CanonicalJob::source`.
    fn name(&self) -> &'static str;

    async fn search(&self, query: &JobQuery) -> Result<Vec<CanonicalJob>, JobSourceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Adzuna
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

/// Adzuna search client with retry on 429/5xx and an optional page cache.
#[derive(Clone)]
pub struct AdzunaClient {
    client: Client,
    base_url: String,
    credentials: Option<AdzunaCredentials>,
    cache: Option<Arc<dyn PageCache>>,
}

impl AdzunaClient {
    pub fn new(
        base_url: String,
        credentials: Option<AdzunaCredentials>,
        cache: Option<Arc<dyn PageCache>>,
    ) -> Result<Self, JobSourceError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            cache,
        })
    }

    fn search_url(&self, query: &JobQuery) -> String {
        format!(
            "{}/{}/search/{}",
            self.base_url,
            query.location.to_lowercase(),
            query.page
        )
    }

    /// Fetches the raw response body, retrying 429 and 5xx with exponential backoff.
    async fn fetch_page(
        &self,
        credentials: &AdzunaCredentials,
        query: &JobQuery,
    ) -> Result<String, JobSourceError> {
        info!(
            "Fetching jobs from Adzuna for '{}' in {} (page {})",
            if query.job_title.is_empty() { "all" } else { query.job_title.as_str() },
            query.location,
            query.page
        );

        let url = self.search_url(query);
        let per_page = query.results_per_page.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("app_id", credentials.app_id.as_str()),
            ("app_key", credentials.app_key.as_str()),
            ("results_per_page", per_page.as_str()),
            ("sort_by", "date"),
        ];
        if !query.job_title.trim().is_empty() {
            params.push(("what", query.job_title.as_str()));
        }

        let mut last_error: Option<JobSourceError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Adzuna attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(&url).query(&params).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(JobSourceError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Adzuna returned {}: {}", status, body);
                last_error = Some(JobSourceError::Upstream {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(JobSourceError::Upstream {
                    status: status.as_u16(),
                    message: body,
                });
            }

            return Ok(response.text().await?);
        }

        Err(last_error.unwrap_or(JobSourceError::Upstream {
            status: 429,
            message: format!("gave up after {MAX_RETRIES} attempts"),
        }))
    }
}

#[async_trait]
impl JobSource for AdzunaClient {
    fn name(&self) -> &'static str {
        AdzunaNormalizer.source_name()
    }

    async fn search(&self, query: &JobQuery) -> Result<Vec<CanonicalJob>, JobSourceError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(JobSourceError::NotConfigured(self.name()))?;

        let key = cache_key(self.name(), query);
        let jobs = load_page(self.cache.as_deref(), &key, || {
            self.fetch_page(credentials, query)
        })
        .await?;

        info!("Fetched {} jobs from Adzuna", jobs.len());
        Ok(jobs)
    }
}

/// Serves a page from `cache` when it holds a readable copy, otherwise fetches
/// it. Only bodies that normalize successfully are written back.
pub async fn load_page<F, Fut>(
    cache: Option<&dyn PageCache>,
    key: &str,
    fetch: F,
) -> Result<Vec<CanonicalJob>, JobSourceError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, JobSourceError>>,
{
    if let Some(cache) = cache {
        if let Some(body) = cache.get(key).await {
            match normalize_page(&body) {
                Ok(jobs) => {
                    debug!("Job search cache hit: {key}");
                    return Ok(jobs);
                }
                Err(e) => warn!("Ignoring unreadable cached page {key}: {e}"),
            }
        }
    }

    let body = fetch().await?;
    let jobs = normalize_page(&body)?;

    if let Some(cache) = cache {
        cache.put(key, &body).await;
    }
    Ok(jobs)
}

/// Normalizes an Adzuna response body. Records that fail validation are skipped.
pub fn normalize_page(body: &str) -> Result<Vec<CanonicalJob>, JobSourceError> {
    let response: AdzunaSearchResponse = serde_json::from_str(body)?;
    let now = Utc::now();

    Ok(response
        .results
        .into_iter()
        .filter_map(|raw| match AdzunaNormalizer.normalize(raw, now) {
            Ok(job) => Some(job),
            Err(e) => {
                warn!("Skipping job record: {e}");
                None
            }
        })
        .collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Page cache
// ────────────────────────────────────────────────────────────────────────────

/// Raw search response storage. Failures are logged and treated as misses.
#[async_trait]
pub trait PageCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn put(&self, key: &str, body: &str);
}

pub fn cache_key(source: &str, query: &JobQuery) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        source,
        query.location.to_lowercase(),
        query.page,
        query.results_per_page,
        query.job_title.trim().to_lowercase()
    )
}

/// Redis-backed `PageCache` sharing one auto-reconnecting connection.
#[derive(Clone)]
pub struct SearchCache {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl SearchCache {
    pub async fn connect(client: redis::Client, ttl_secs: u64) -> redis::RedisResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl_secs })
    }

    async fn try_get(&self, key: &str) -> redis::RedisResult<Option<String>> {
        let mut conn = self.conn.clone();
        redis::cmd("GET").arg(key).query_async(&mut conn).await
    }

    async fn try_put(&self, key: &str, body: &str) -> redis::RedisResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(body)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await
    }
}

#[async_trait]
impl PageCache for SearchCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.try_get(key).await.unwrap_or_else(|e| {
            warn!("Job search cache read failed: {e}");
            None
        })
    }

    async fn put(&self, key: &str, body: &str) {
        if let Err(e) = self.try_put(key, body).await {
            warn!("Job search cache write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    const GOOD_PAGE: &str = r#"{"results": [{"id": "7", "title": "Platform Engineer"}]}"#;
    const MAINTENANCE_PAGE: &str = "<html>down for maintenance</html>";

    #[derive(Default)]
    struct MemoryCache {
        pages: Mutex<HashMap<String, String>>,
    }

    impl MemoryCache {
        fn stored(&self, key: &str) -> Option<String> {
            self.pages.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl PageCache for MemoryCache {
        async fn get(&self, key: &str) -> Option<String> {
            self.stored(key)
        }

        async fn put(&self, key: &str, body: &str) {
            self.pages
                .lock()
                .unwrap()
                .insert(key.to_string(), body.to_string());
        }
    }

    fn query() -> JobQuery {
        JobQuery {
            location: "GB".to_string(),
            job_title: " Rust Engineer ".to_string(),
            results_per_page: 20,
            page: 2,
        }
    }

    #[test]
    fn test_search_url_lowercases_country() {
        let client = AdzunaClient::new("https://api.adzuna.com/v1/api/jobs/".to_string(), None, None)
            .unwrap();
        assert_eq!(
            client.search_url(&query()),
            "https://api.adzuna.com/v1/api/jobs/gb/search/2"
        );
    }

    #[test]
    fn test_cache_key_normalizes_query() {
        assert_eq!(cache_key("adzuna", &query()), "adzuna:gb:2:20:rust engineer");
    }

    #[test]
    fn test_supported_locations_case_insensitive() {
        assert!(is_supported_location("us"));
        assert!(is_supported_location("SG"));
        assert!(!is_supported_location("XX"));
    }

    #[tokio::test]
    async fn test_search_without_credentials_is_not_configured() {
        let client = AdzunaClient::new("http://localhost".to_string(), None, None).unwrap();
        let err = client.search(&query()).await.unwrap_err();
        assert!(matches!(err, JobSourceError::NotConfigured("adzuna")));
    }

    #[test]
    fn test_normalize_page_skips_invalid_records() {
        let body = r#"{
            "count": 3,
            "results": [
                {"id": "1", "title": "Backend Developer", "description": "Go and Docker"},
                {"id": "2", "description": "no title here"},
                {"id": "3", "title": "Frontend Developer", "description": "React"}
            ]
        }"#;
        let jobs = normalize_page(body).unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(jobs[0].requirements.contains("Docker"));
    }

    #[test]
    fn test_normalize_page_rejects_malformed_body() {
        assert!(matches!(
            normalize_page("<html>oops</html>"),
            Err(JobSourceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_page_is_not_cached() {
        let memory = MemoryCache::default();
        let cache: &dyn PageCache = &memory;

        let result = load_page(Some(cache), "k", || async {
            Ok::<_, JobSourceError>(MAINTENANCE_PAGE.to_string())
        })
        .await;
        assert!(matches!(result, Err(JobSourceError::Parse(_))));
        assert_eq!(memory.stored("k"), None);

        let jobs = load_page(Some(cache), "k", || async {
            Ok::<_, JobSourceError>(GOOD_PAGE.to_string())
        })
        .await
        .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(memory.stored("k").as_deref(), Some(GOOD_PAGE));
    }

    #[tokio::test]
    async fn test_cached_page_skips_fetch() {
        let memory = MemoryCache::default();
        memory.put("k", GOOD_PAGE).await;
        let cache: &dyn PageCache = &memory;

        let jobs = load_page(Some(cache), "k", || async {
            Err::<String, _>(JobSourceError::Upstream {
                status: 503,
                message: "should not be called".to_string(),
            })
        })
        .await
        .unwrap();
        assert_eq!(jobs[0].id, "7");
    }

    #[tokio::test]
    async fn test_unreadable_cached_page_is_refetched() {
        let memory = MemoryCache::default();
        memory.put("k", MAINTENANCE_PAGE).await;
        let cache: &dyn PageCache = &memory;

        let jobs = load_page(Some(cache), "k", || async {
            Ok::<_, JobSourceError>(GOOD_PAGE.to_string())
        })
        .await
        .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(memory.stored("k").as_deref(), Some(GOOD_PAGE));
    }

    #[tokio::test]
    async fn test_load_page_without_cache_fetches() {
        let jobs = load_page(None, "k", || async {
            Ok::<_, JobSourceError>(GOOD_PAGE.to_string())
        })
        .await
        .unwrap();
        assert_eq!(jobs[0].title, "Platform Engineer");
    }
}
