//! Configuration loader
//!
//! Loads client configuration from environment variables and/or files.
//!
//! ## Loading Strategy
//! 1. Probes for a config file (JSON or TOML)
//! 2. If one is found, its values are the base and any set environment
//!    variables override them
//! 3. Otherwise the configuration comes from the environment alone
//!
//! ## Environment Variables
//! - `POKITDOK_CLIENT_ID`: OAuth2 client id (required without a file)
//! - `POKITDOK_CLIENT_SECRET`: OAuth2 client secret (required without a file)
//! - `POKITDOK_BASE_URL`: Platform base URL
//! - `POKITDOK_API_VERSION`: API version segment, e.g. `v4`
//! - `POKITDOK_REDIRECT_URI`: Redirect URI for the authorization-code flow
//! - `POKITDOK_SCOPES`: Comma or space separated scopes
//! - `POKITDOK_TIMEOUT_SECS`: Request timeout in seconds
//! - `POKITDOK_AUTO_REFRESH`: Refresh expired tokens automatically (true/false)
//! - `POKITDOK_REFRESH_THRESHOLD_SECS`: Refresh this many seconds early
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./pokitdok.json` or `./pokitdok.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use pokitdok_domain::{ClientConfig, PokitDokError, Result};

pub const ENV_CLIENT_ID: &str = "POKITDOK_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "POKITDOK_CLIENT_SECRET";
pub const ENV_BASE_URL: &str = "POKITDOK_BASE_URL";
pub const ENV_API_VERSION: &str = "POKITDOK_API_VERSION";
pub const ENV_REDIRECT_URI: &str = "POKITDOK_REDIRECT_URI";
pub const ENV_SCOPES: &str = "POKITDOK_SCOPES";
pub const ENV_TIMEOUT_SECS: &str = "POKITDOK_TIMEOUT_SECS";
pub const ENV_AUTO_REFRESH: &str = "POKITDOK_AUTO_REFRESH";
pub const ENV_REFRESH_THRESHOLD_SECS: &str = "POKITDOK_REFRESH_THRESHOLD_SECS";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["pokitdok.json", "pokitdok.toml", "config.json", "config.toml"];

/// Load configuration, layering environment variables over a config file
///
/// # Errors
/// Returns `PokitDokError::Config` if:
/// - No file is found and the required environment variables are missing
/// - The file format is invalid
/// - An environment variable has an invalid value
/// - The resulting configuration fails validation
pub fn load() -> Result<ClientConfig> {
    let config = match probe_config_paths() {
        Some(path) => {
            let config = load_from_file(Some(path))?;
            apply_env_overrides(config)?
        }
        None => {
            tracing::debug!("No config file found, using environment only");
            load_from_env()?
        }
    };

    config.validate()?;
    tracing::info!(base_url = %config.base_url, "Configuration loaded");
    Ok(config)
}

/// Load configuration from environment variables
///
/// `POKITDOK_CLIENT_ID` and `POKITDOK_CLIENT_SECRET` must be present; every
/// other setting falls back to its default.
///
/// # Errors
/// Returns `PokitDokError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<ClientConfig> {
    let client_id = env_var(ENV_CLIENT_ID)?;
    let client_secret = env_var(ENV_CLIENT_SECRET)?;

    apply_env_overrides(ClientConfig::new(client_id, client_secret))
}

/// Overlay every set environment variable onto `config`
///
/// # Errors
/// Returns `PokitDokError::Config` when a numeric variable does not parse.
pub fn apply_env_overrides(mut config: ClientConfig) -> Result<ClientConfig> {
    if let Some(client_id) = env_opt(ENV_CLIENT_ID) {
        config.client_id = client_id;
    }
    if let Some(client_secret) = env_opt(ENV_CLIENT_SECRET) {
        config.client_secret = client_secret;
    }
    if let Some(base_url) = env_opt(ENV_BASE_URL) {
        config.base_url = base_url;
    }
    if let Some(api_version) = env_opt(ENV_API_VERSION) {
        config.api_version = api_version;
    }
    if let Some(redirect_uri) = env_opt(ENV_REDIRECT_URI) {
        config.redirect_uri = Some(redirect_uri);
    }
    if let Some(scopes) = env_opt(ENV_SCOPES) {
        config.scopes = parse_scopes(&scopes);
    }
    if let Some(timeout) = env_opt(ENV_TIMEOUT_SECS) {
        config.timeout_seconds = timeout
            .parse::<u64>()
            .map_err(|e| PokitDokError::Config(format!("Invalid timeout: {}", e)))?;
    }
    config.auto_refresh = env_bool(ENV_AUTO_REFRESH, config.auto_refresh);
    if let Some(threshold) = env_opt(ENV_REFRESH_THRESHOLD_SECS) {
        config.refresh_threshold_seconds = threshold
            .parse::<i64>()
            .map_err(|e| PokitDokError::Config(format!("Invalid refresh threshold: {}", e)))?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PokitDokError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PokitDokError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PokitDokError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PokitDokError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PokitDokError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PokitDokError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PokitDokError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Split a scope list on commas and whitespace
fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        PokitDokError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-empty environment variable, if set
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 9] = [
        ENV_CLIENT_ID,
        ENV_CLIENT_SECRET,
        ENV_BASE_URL,
        ENV_API_VERSION,
        ENV_REDIRECT_URI,
        ENV_SCOPES,
        ENV_TIMEOUT_SECS,
        ENV_AUTO_REFRESH,
        ENV_REFRESH_THRESHOLD_SECS,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_POKITDOK_BOOL_YES", "YES");
        std::env::set_var("TEST_POKITDOK_BOOL_OFF", "off");
        std::env::remove_var("TEST_POKITDOK_BOOL_MISSING");

        assert!(env_bool("TEST_POKITDOK_BOOL_YES", false));
        assert!(!env_bool("TEST_POKITDOK_BOOL_OFF", true));
        assert!(env_bool("TEST_POKITDOK_BOOL_MISSING", true));
        assert!(!env_bool("TEST_POKITDOK_BOOL_MISSING", false));

        std::env::remove_var("TEST_POKITDOK_BOOL_YES");
        std::env::remove_var("TEST_POKITDOK_BOOL_OFF");
    }

    #[test]
    fn test_parse_scopes() {
        assert_eq!(
            parse_scopes("user_schedule, claims  eligibility"),
            vec!["user_schedule".to_string(), "claims".to_string(), "eligibility".to_string()]
        );
        assert!(parse_scopes(" , ").is_empty());
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CLIENT_ID, "id-123");
        std::env::set_var(ENV_CLIENT_SECRET, "secret-456");
        std::env::set_var(ENV_BASE_URL, "http://localhost:5002");
        std::env::set_var(ENV_API_VERSION, "v5");
        std::env::set_var(ENV_REDIRECT_URI, "https://app.example/callback");
        std::env::set_var(ENV_SCOPES, "user_schedule,claims");
        std::env::set_var(ENV_TIMEOUT_SECS, "15");
        std::env::set_var(ENV_AUTO_REFRESH, "false");
        std::env::set_var(ENV_REFRESH_THRESHOLD_SECS, "30");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.client_id, "id-123");
        assert_eq!(config.client_secret, "secret-456");
        assert_eq!(config.api_base_url(), "http://localhost:5002/api/v5");
        assert_eq!(config.redirect_uri.as_deref(), Some("https://app.example/callback"));
        assert_eq!(config.scopes, vec!["user_schedule".to_string(), "claims".to_string()]);
        assert_eq!(config.timeout_seconds, 15);
        assert!(!config.auto_refresh);
        assert_eq!(config.refresh_threshold_seconds, 30);
    }

    #[test]
    fn test_load_from_env_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CLIENT_ID, "id");
        std::env::set_var(ENV_CLIENT_SECRET, "secret");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config, ClientConfig::new("id", "secret"));
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CLIENT_ID, "id");

        let result = load_from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(matches!(err, PokitDokError::Config(ref msg) if msg.contains(ENV_CLIENT_SECRET)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CLIENT_ID, "id");
        std::env::set_var(ENV_CLIENT_SECRET, "secret");
        std::env::set_var(ENV_TIMEOUT_SECS, "ninety");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(PokitDokError::Config(_))));
    }

    #[test]
    fn test_out_of_range_threshold_fails_validation() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CLIENT_ID, "id");
        std::env::set_var(ENV_CLIENT_SECRET, "secret");
        std::env::set_var(ENV_REFRESH_THRESHOLD_SECS, i64::MAX.to_string());

        let result = load_from_env();
        clear_env();

        let config = result.expect("threshold parses as i64");
        assert!(matches!(config.validate(), Err(PokitDokError::Config(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let path = write_temp(
            r#"
client_id = "file-id"
client_secret = "file-secret"
api_version = "v4"
timeout_seconds = 20
"#,
            "toml",
        );
        let from_file = load_from_file(Some(path.clone())).unwrap();

        std::env::set_var(ENV_CLIENT_SECRET, "env-secret");
        std::env::set_var(ENV_API_VERSION, "v5");
        let result = apply_env_overrides(from_file);
        clear_env();
        std::fs::remove_file(path).ok();

        let config = result.unwrap();
        assert_eq!(config.client_id, "file-id");
        assert_eq!(config.client_secret, "env-secret");
        assert_eq!(config.api_version, "v5");
        assert_eq!(config.timeout_seconds, 20);
    }

    #[test]
    fn test_load_from_file_json() {
        let path = write_temp(
            r#"{
                "client_id": "json-id",
                "client_secret": "json-secret",
                "base_url": "http://localhost:5002",
                "scopes": ["user_schedule"]
            }"#,
            "json",
        );

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.expect("config from JSON file");
        assert_eq!(config.client_id, "json-id");
        assert_eq!(config.base_url, "http://localhost:5002");
        assert_eq!(config.api_version, "v4");
        assert_eq!(config.scopes, vec!["user_schedule".to_string()]);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/pokitdok.json")));
        assert!(matches!(result, Err(PokitDokError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = write_temp(r#"{ "client_id": "x" "#, "json");

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        assert!(result.is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_parse_config_missing_credentials() {
        let result = parse_config(r#"base_url = "http://localhost""#, Path::new("pokitdok.toml"));
        assert!(result.is_err(), "client_id and client_secret are required in files");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("client_id: x", Path::new("pokitdok.yaml"));
        assert!(matches!(result, Err(PokitDokError::Config(ref msg)) if msg.contains("yaml")));
    }
}
