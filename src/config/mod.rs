/// Configuration system for refdash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::RefdashConfig::default()`]
/// 2. **User global config** — `~/.refdash/config.toml`
/// 3. **Project local config** — `.refdash.toml` in the current working directory
/// 4. **Environment variables** — `REFDASH_*` overrides (highest precedence)
///
/// Later layers override earlier ones. Missing sections in a TOML file fall
/// back to the previous layer's values.
///
/// # Usage
///
/// ```rust,ignore
/// use refdash::config;
///
/// let cfg = config::load();
/// println!("polling {} every {}s", cfg.server.base_url, cfg.dashboard.poll_interval_secs);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::RefdashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved refdash configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> RefdashConfig {
    let mut config = RefdashConfig::default();

    // Layer 2: user global config (~/.refdash/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        merge_config(&mut config, &global);
    }

    // Layer 3: project local config (.refdash.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A malformed file is ignored rather than aborting
/// the dashboard — the built-in defaults always work.
fn load_toml_file(path: Option<PathBuf>) -> Option<RefdashConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge a loaded config layer into the base config.
///
/// Each TOML file is deserialized with `serde(default)`, so unset keys carry
/// the built-in defaults. The overlay therefore fully replaces the base:
/// values the user never touched match the base's defaults anyway, and
/// values they did touch are exactly the ones that should win.
fn merge_config(base: &mut RefdashConfig, overlay: &RefdashConfig) {
    *base = overlay.clone();
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.refdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".refdash").join("config.toml"))
}

/// Path to the project local config: `.refdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".refdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `REFDASH_SERVER_URL` — analysis service base URL
/// - `REFDASH_TIMEOUT_MS` — per-request deadline in milliseconds
/// - `REFDASH_POLL_INTERVAL_SECS` — watch-mode reload interval
/// - `REFDASH_HISTORY` — load-history logging (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut RefdashConfig) {
    if let Ok(val) = std::env::var("REFDASH_SERVER_URL")
        && !val.is_empty()
    {
        config.server.base_url = val;
    }
    if let Ok(val) = std::env::var("REFDASH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.server.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("REFDASH_POLL_INTERVAL_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.dashboard.poll_interval_secs = secs;
    }
    if let Ok(val) = std::env::var("REFDASH_HISTORY") {
        config.history.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.refdash/config.toml`.
///
/// Creates the `~/.refdash/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.refdash/ directory")?;
    }

    fs::write(&path, RefdashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or serialized defaults when no file
/// exists), updates the specified dotted key (`server.timeout_ms`), and
/// writes the result back.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&RefdashConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;

    set_toml_value(&mut value_table, key, value)?;

    let toml_str = toml::to_string_pretty(&value_table).context("failed to serialize config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, toml_str).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    // Parse the new value according to the existing value's type.
    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[server]
base_url = "http://127.0.0.1:5000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "server.base_url", "http://analysis:8080").unwrap();

        let table = root.as_table().unwrap();
        let server = table["server"].as_table().unwrap();
        assert_eq!(server["base_url"].as_str(), Some("http://analysis:8080"));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[server]
timeout_ms = 10000
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "server.timeout_ms", "2500").unwrap();

        let table = root.as_table().unwrap();
        let server = table["server"].as_table().unwrap();
        assert_eq!(server["timeout_ms"].as_integer(), Some(2500));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let toml_str = r#"
[history]
enabled = true
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "history.enabled", "false").unwrap();

        let table = root.as_table().unwrap();
        let history = table["history"].as_table().unwrap();
        assert_eq!(history["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[server]
base_url = "http://127.0.0.1:5000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let result = show_effective_config();
        assert!(result.is_ok());
        let toml_str = result.unwrap();
        // Should be parseable back
        let _: RefdashConfig = toml::from_str(&toml_str).unwrap();
    }
}
