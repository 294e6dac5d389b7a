//! Project stats fetching and the loader that feeds the stats store.
//!
//! DESIGN
//! ======
//! `StatsFetcher` is the narrow seam to the network: it turns a batch of
//! project ids into project payloads. `HttpStatsFetcher` is the reqwest
//! implementation; tests swap in mocks. `StatsLoader` owns batching and retry
//! and is the only writer of the stats store. The store never learns whether
//! or how a fetch succeeded.
//!
//! ERROR HANDLING
//! ==============
//! Failures are logged and returned to the caller; the store is left
//! untouched, so cards keep whatever snapshot they already had. Ids of a
//! failed batch are not re-queued.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::config::ApiConfig;
use super::types::{Organization, Project};
use crate::state::projects_stats::{ProjectsStatsStore, on_stats_load_success};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by projects API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The HTTP request could not be sent or the body could not be read.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The request itself was malformed (bad URL, bad header) and was never sent.
    #[error("API request invalid: {0}")]
    InvalidRequest(String),

    /// The API returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The response body was not a list of projects.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Whether a later attempt of the same request may succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// QUERY
// =============================================================================

/// Optional data subsets requested alongside project stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsQuery {
    /// Include per-bucket transaction counts.
    pub transaction_stats: bool,
    /// Include release-health (crash free) numbers.
    pub session_stats: bool,
    /// Window the series cover, e.g. `24h`.
    pub stats_period: String,
}

impl StatsQuery {
    /// The query a project card issues: transaction stats only for
    /// organizations with performance, session stats always.
    #[must_use]
    pub fn for_organization(org: &Organization, stats_period: &str) -> Self {
        Self {
            transaction_stats: org.has_performance(),
            session_stats: true,
            stats_period: stats_period.to_owned(),
        }
    }
}

fn projects_endpoint(base_url: &str, org_slug: &str) -> String {
    format!("{}/api/0/organizations/{org_slug}/projects/", base_url.trim_end_matches('/'))
}

fn stats_query_pairs(project_ids: &[String], query: &StatsQuery) -> Vec<(&'static str, String)> {
    let ids = project_ids
        .iter()
        .map(|id| format!("id:{id}"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut pairs = vec![("statsPeriod", query.stats_period.clone()), ("query", ids)];
    if query.transaction_stats {
        pairs.push(("transactionStats", "1".to_owned()));
    }
    if query.session_stats {
        pairs.push(("sessionStats", "1".to_owned()));
    }
    pairs
}

fn request_error(e: reqwest::Error) -> ApiError {
    if e.is_builder() {
        ApiError::InvalidRequest(e.to_string())
    } else {
        ApiError::ApiRequest(e.to_string())
    }
}

fn parse_projects_response(status: u16, body: &str) -> Result<Vec<Project>, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::ApiResponse { status, body: body.to_owned() });
    }
    serde_json::from_str(body).map_err(|e| ApiError::ApiParse(e.to_string()))
}

// =============================================================================
// FETCHER
// =============================================================================

/// Source of project payloads for a batch of project ids.
#[async_trait::async_trait]
pub trait StatsFetcher: Send + Sync {
    /// Fetch the projects named by `project_ids` with the stats `query` asks for.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the body is malformed.
    async fn fetch_projects(
        &self,
        org_slug: &str,
        project_ids: &[String],
        query: &StatsQuery,
    ) -> Result<Vec<Project>, ApiError>;
}

/// [`StatsFetcher`] backed by the organization projects HTTP endpoint.
pub struct HttpStatsFetcher {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpStatsFetcher {
    /// Build a fetcher with the configured base URL, token and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), auth_token: config.auth_token.clone() })
    }
}

#[async_trait::async_trait]
impl StatsFetcher for HttpStatsFetcher {
    async fn fetch_projects(
        &self,
        org_slug: &str,
        project_ids: &[String],
        query: &StatsQuery,
    ) -> Result<Vec<Project>, ApiError> {
        let url = projects_endpoint(&self.base_url, org_slug);
        let mut request = self
            .http
            .get(&url)
            .query(&stats_query_pairs(project_ids, query));
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(request_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(request_error)?;

        parse_projects_response(status, &text)
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Batches project ids and publishes fetched projects into the stats store.
pub struct StatsLoader {
    fetcher: Arc<dyn StatsFetcher>,
    store: ProjectsStatsStore,
    pending: Mutex<Vec<String>>,
    retries: u32,
    backoff: Duration,
}

impl StatsLoader {
    /// Loader with no retries.
    #[must_use]
    pub fn new(fetcher: Arc<dyn StatsFetcher>, store: ProjectsStatsStore) -> Self {
        Self {
            fetcher,
            store,
            pending: Mutex::new(Vec::new()),
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Retry retryable failures up to `retries` extra times, sleeping
    /// `backoff * attempt` between attempts.
    #[must_use]
    pub fn with_retry(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn store(&self) -> &ProjectsStatsStore {
        &self.store
    }

    /// Queue a project for the next flush. Returns `false` if it is already queued.
    pub fn enqueue(&self, project_id: impl Into<String>) -> bool {
        let project_id = project_id.into();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.contains(&project_id) {
            return false;
        }
        pending.push(project_id);
        true
    }

    /// Project ids waiting for the next flush, in enqueue order.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Fetch every queued project in one request and publish the results.
    ///
    /// Returns the number of store entries that changed.
    ///
    /// # Errors
    ///
    /// Returns the last [`ApiError`] when every attempt failed.
    pub async fn flush(&self, org_slug: &str, query: &StatsQuery) -> Result<usize, ApiError> {
        let batch = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *pending)
        };
        if batch.is_empty() {
            return Ok(0);
        }

        let mut attempt = 0;
        loop {
            match self.fetcher.fetch_projects(org_slug, &batch, query).await {
                Ok(projects) => {
                    let received = projects.len();
                    let changed = on_stats_load_success(&self.store, projects);
                    let requested = batch.len();
                    tracing::debug!(
                        org = org_slug,
                        requested,
                        received,
                        changed,
                        "project stats loaded"
                    );
                    return Ok(changed);
                }
                Err(e) if e.retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        org = org_slug,
                        attempt,
                        error = %e,
                        "project stats fetch failed; retrying"
                    );
                    if !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
                Err(e) => {
                    let projects = batch.len();
                    tracing::warn!(
                        org = org_slug,
                        projects,
                        error = %e,
                        "project stats fetch failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// Queue one project and flush immediately.
///
/// # Errors
///
/// See [`StatsLoader::flush`].
pub async fn load_stats_for_project(
    loader: &StatsLoader,
    org_slug: &str,
    project_id: &str,
    query: &StatsQuery,
) -> Result<usize, ApiError> {
    loader.enqueue(project_id);
    loader.flush(org_slug, query).await
}
