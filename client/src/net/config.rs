//! Projects API configuration parsed from environment variables.

use super::api::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000";
pub const DEFAULT_STATS_PERIOD: &str = "24h";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FETCH_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub auth_token: Option<String>,
    pub stats_period: String,
    pub timeouts: ApiTimeouts,
    /// Extra attempts after a retryable failure.
    pub fetch_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            auth_token: None,
            stats_period: DEFAULT_STATS_PERIOD.to_owned(),
            timeouts: ApiTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            fetch_retries: DEFAULT_FETCH_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl ApiConfig {
    /// Build typed API config from environment variables.
    ///
    /// Optional:
    /// - `DASHBOARD_BASE_URL`: default `http://127.0.0.1:9000`
    /// - `DASHBOARD_AUTH_TOKEN`: bearer token, unset for anonymous access
    /// - `DASHBOARD_STATS_PERIOD`: default `24h`
    /// - `DASHBOARD_REQUEST_TIMEOUT_SECS`: default 30
    /// - `DASHBOARD_CONNECT_TIMEOUT_SECS`: default 10
    /// - `DASHBOARD_FETCH_RETRIES`: default 2
    /// - `DASHBOARD_RETRY_BACKOFF_MS`: default 250
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigParse`] when a numeric variable is set but
    /// not a valid number, or the base URL is not an absolute `http(s)` URL.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup("DASHBOARD_BASE_URL") {
            Some(raw) => normalize_base_url("DASHBOARD_BASE_URL", &raw)?,
            None => DEFAULT_BASE_URL.to_owned(),
        };

        let auth_token = lookup("DASHBOARD_AUTH_TOKEN").filter(|token| !token.trim().is_empty());
        let stats_period =
            lookup("DASHBOARD_STATS_PERIOD").unwrap_or_else(|| DEFAULT_STATS_PERIOD.to_owned());

        Ok(Self {
            base_url,
            auth_token,
            stats_period,
            timeouts: ApiTimeouts {
                request_secs: parse_or(
                    &lookup,
                    "DASHBOARD_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
                connect_secs: parse_or(
                    &lookup,
                    "DASHBOARD_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                )?,
            },
            fetch_retries: parse_or(&lookup, "DASHBOARD_FETCH_RETRIES", DEFAULT_FETCH_RETRIES)?,
            retry_backoff_ms: parse_or(
                &lookup,
                "DASHBOARD_RETRY_BACKOFF_MS",
                DEFAULT_RETRY_BACKOFF_MS,
            )?,
        })
    }

    /// Replace the base URL with a command-line override, validated the same
    /// way as `DASHBOARD_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigParse`] for an empty or non-`http(s)` URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ApiError> {
        self.base_url = normalize_base_url("--base-url", raw)?;
        Ok(self)
    }
}

/// Trim whitespace and trailing slashes; require an `http://` or `https://`
/// URL with something after the scheme.
fn normalize_base_url(source: &str, raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::ConfigParse(format!("{source} is empty")));
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ApiError::ConfigParse(format!(
            "{source} must be an absolute http(s) URL: {raw}"
        ))),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ApiError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ApiError::ConfigParse(format!("invalid {key}: {raw}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
