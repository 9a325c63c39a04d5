//! HTTP implementation of [`AnalysisApi`] over the synchronous `ureq`
//! client.
//!
//! Every request carries an explicit timeout so a hung service surfaces as
//! an ordinary transport failure instead of stalling a load cycle
//! indefinitely. Application-level failures (an `error` field in an
//! otherwise well-formed body, or a 5xx with a JSON error body) are
//! converted to `Err` here so the controller sees a single failure channel.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::schema::ServerConfig;

use super::AnalysisApi;
use super::models::{
    FileStatsReport, FindingsReport, FunctionRecord, MagicNumberRecord, Overview,
    RawPointerReport, RefreshOutcome,
};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous analysis-service client.
///
/// Cheap to construct; holds no connection state. One client is created per
/// CLI invocation and shared by all requests of that invocation.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    base_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    /// Build a client from the resolved `[server]` config section.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    /// Build a client for an explicit base URL and request deadline.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// The normalized base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the JSON body into `T`.
    ///
    /// The body is read as a generic `Value` first so an `error` field can
    /// be detected before typed decoding — error bodies usually lack the
    /// fields the typed model requires, and "missing field `statistics`"
    /// would bury the service's actual message.
    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let body: Value = match ureq::get(&url).timeout(self.timeout).call() {
            Ok(resp) => resp
                .into_json()
                .with_context(|| format!("invalid JSON from {path}"))?,
            Err(ureq::Error::Status(code, resp)) => {
                // The service reports analysis failures as 5xx with a JSON
                // error body. Surface that message when present.
                if let Ok(body) = resp.into_json::<Value>()
                    && let Some(message) = body.get("error").and_then(Value::as_str)
                {
                    anyhow::bail!("analysis service error (HTTP {code}): {message}");
                }
                anyhow::bail!("analysis service returned HTTP {code} for {path}");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("request to {url} failed"));
            }
        };

        if let Some(message) = body.get("error").and_then(Value::as_str) {
            anyhow::bail!("analysis service error: {message}");
        }

        serde_json::from_value(body).with_context(|| format!("unexpected response shape from {path}"))
    }
}

impl AnalysisApi for HttpAnalysisClient {
    fn fetch_overview(&self) -> Result<Overview> {
        self.get_json("/api/analysis/overview")
    }

    fn fetch_findings(&self) -> Result<FindingsReport> {
        self.get_json("/api/analysis/findings")
    }

    fn fetch_functions(&self) -> Result<Vec<FunctionRecord>> {
        self.get_json("/api/analysis/functions")
    }

    fn fetch_magic_numbers(&self) -> Result<Vec<MagicNumberRecord>> {
        self.get_json("/api/analysis/magic-numbers")
    }

    fn fetch_file_stats(&self) -> Result<FileStatsReport> {
        self.get_json("/api/analysis/file-stats")
    }

    fn fetch_raw_pointers(&self) -> Result<RawPointerReport> {
        self.get_json("/api/analysis/raw-pointers")
    }

    fn trigger_refresh(&self) -> Result<RefreshOutcome> {
        self.get_json("/api/analysis/refresh")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
