//! Configuration schema and defaults for refdash.
//!
//! Defines the TOML-serializable structure with the `[server]`,
//! `[dashboard]`, and `[history]` sections. Every field has a built-in
//! default; users only set what they want to override.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level refdash configuration.
///
/// Maps directly to the `~/.refdash/config.toml` and `.refdash.toml` file
/// schemas. All sections and fields are optional — missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RefdashConfig {
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub history: HistoryConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Analysis service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the analysis service.
    pub base_url: String,
    /// Per-request deadline in milliseconds. A request past this deadline
    /// fails like any other transport error.
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Dashboard behavior settings.
///
/// Table row caps (20 findings, 15 magic numbers) are fixed constants of the
/// dashboard, not configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between scheduled reloads in watch mode.
    pub poll_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// [history]
// ---------------------------------------------------------------------------

/// Load-history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether completed load cycles are appended to
    /// `~/.refdash/load-history.jsonl`.
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default config file
// ---------------------------------------------------------------------------

impl RefdashConfig {
    /// The annotated TOML written by `refdash config init`.
    pub fn default_toml() -> String {
        r#"# refdash Configuration
# Terminal dashboard for refactor-analysis findings
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (REFDASH_*)
#   2. Project config (.refdash.toml in current directory)
#   3. User global config (~/.refdash/config.toml)
#   4. Built-in defaults

[server]
base_url = "http://127.0.0.1:5000"   # Analysis service root
timeout_ms = 10000                   # Per-request deadline

[dashboard]
poll_interval_secs = 300             # Watch-mode reload interval

[history]
enabled = true                       # Append load cycles to ~/.refdash/load-history.jsonl
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
