//! Supabase health prober.
//!
//! Issues a single `GET <project-url>/auth/v1/health` per check and folds every
//! outcome (missing input, upstream response, transport failure) into a
//! [`HealthCheckResult`]. Nothing is cached between checks and nothing is retried.

pub mod classify;
pub mod defaults;

use std::sync::Arc;
use std::time::{Duration, Instant};

use http::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{SupabaseConfig, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_URL, HEALTH_PATH, PROBE_USER_AGENT};
use classify::normalize_network_error;
pub use defaults::{DefaultsSource, EnvDefaults, ProbeDefaults, StaticDefaults};

/// Credentials supplied with a check. Absent fields fall back to the configured defaults.
///
/// Only an absent field falls back. An explicit `null` is kept as an empty
/// value and reported as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckInput {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub api_key: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Some(Option::<String>::deserialize(deserializer)?.unwrap_or_default()))
}

impl HealthCheckInput {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            api_key: Some(api_key.into()),
        }
    }

    /// Parses a request body, treating anything that is not a valid input object as empty.
    pub fn from_json_lenient(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthCheckResult {
    pub ok: bool,
    pub status: u16,
    pub message: String,
    pub url: String,
}

impl HealthCheckResult {
    fn missing_url() -> Self {
        Self {
            ok: false,
            status: 400,
            message: format!(
                "Missing Supabase project URL. Provide it in the form or set {}.",
                ENV_SUPABASE_URL
            ),
            url: String::new(),
        }
    }

    fn missing_key(url: String) -> Self {
        Self {
            ok: false,
            status: 400,
            message: format!(
                "Missing Supabase anon key. Provide it in the form or set {}.",
                ENV_SUPABASE_ANON_KEY
            ),
            url,
        }
    }

    fn invalid_url(url: String, err: url::ParseError) -> Self {
        Self {
            ok: false,
            status: 400,
            message: format!("Invalid Supabase project URL '{}': {}", url, err),
            url,
        }
    }
}

/// Resolves the health endpoint against a project URL.
///
/// The health path is absolute, so any path already on the project URL is replaced.
pub fn health_endpoint(base: &str) -> Result<Url, url::ParseError> {
    Url::parse(base)?.join(HEALTH_PATH)
}

/// Endpoint for display, falling back to plain concatenation for unparseable URLs.
pub fn display_endpoint(base: &str) -> String {
    match health_endpoint(base) {
        Ok(endpoint) => endpoint.to_string(),
        Err(_) => format!("{}{}", base.trim_end_matches('/'), HEALTH_PATH),
    }
}

/// Failure while talking to the upstream.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("Invalid JSON in health response")]
    Decode(#[from] serde_json::Error),
}

/// Runs health checks against Supabase projects.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HealthProber {
    client: reqwest::Client,
    defaults: Arc<dyn DefaultsSource>,
}

impl HealthProber {
    /// Creates a prober reading defaults from the environment and the config file.
    pub fn from_config(config: &SupabaseConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            Arc::new(EnvDefaults::new(config.clone())),
            config.timeout_seconds.map(Duration::from_secs),
        )
    }

    pub fn new(
        defaults: Arc<dyn DefaultsSource>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(PROBE_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            defaults,
        })
    }

    /// Current defaults, as used for absent input fields.
    pub fn defaults(&self) -> ProbeDefaults {
        self.defaults.defaults()
    }

    /// Runs one check. Every failure is reported in the returned result.
    #[tracing::instrument(name = "probe::probe", skip_all)]
    pub async fn probe(&self, input: HealthCheckInput) -> HealthCheckResult {
        let defaults = self.defaults();
        let url = input.url.or(defaults.url).unwrap_or_default();
        let api_key = input.api_key.or(defaults.api_key).unwrap_or_default();

        if url.is_empty() {
            tracing::debug!("Check skipped: no project URL");
            return HealthCheckResult::missing_url();
        }

        if api_key.is_empty() {
            tracing::debug!(url = %url, "Check skipped: no anon key");
            return HealthCheckResult::missing_key(url);
        }

        let endpoint = match health_endpoint(&url) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Check skipped: invalid project URL");
                return HealthCheckResult::invalid_url(url, e);
            }
        };

        let start = Instant::now();
        match self.fetch(endpoint.clone(), &api_key).await {
            Ok((status, message)) => {
                let ok = (200..300).contains(&status);
                tracing::info!(
                    endpoint = %endpoint,
                    status,
                    ok,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Health check completed"
                );
                HealthCheckResult {
                    ok,
                    status,
                    message,
                    url,
                }
            }
            Err(e) => {
                let normalized = normalize_network_error(&e);
                tracing::warn!(
                    endpoint = %endpoint,
                    status = normalized.status,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Health check failed"
                );
                HealthCheckResult {
                    ok: false,
                    status: normalized.status,
                    message: normalized.message,
                    url,
                }
            }
        }
    }

    /// Sends the probe request and returns the upstream status and body text.
    async fn fetch(&self, endpoint: Url, api_key: &str) -> Result<(u16, String), ProbeError> {
        let response = self
            .client
            .get(endpoint)
            .header("apikey", api_key)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status().as_u16();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);

        let message = if is_json {
            let bytes = response.bytes().await?;
            let json: serde_json::Value = serde_json::from_slice(&bytes)?;
            serde_json::to_string(&json)?
        } else {
            response.text().await?
        };

        Ok((status, message))
    }
}
