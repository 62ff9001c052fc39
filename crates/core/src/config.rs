//! Runtime configuration for the form service and CLI.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Unset values keep the layer below.
//!
//! # Example
//!
//! ```toml
//! webhook_url = "https://hooks.example.com/commitments"
//! imgbb_api_key = "0123456789abcdef"
//! imgbb_expiration = 86400
//! data_dir = "/var/lib/commitment"
//! storage_quota_bytes = 5242880
//! reset_delay_ms = 3000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Placeholder key; uploads short-circuit to a built-in image when set.
pub const DEMO_IMGBB_KEY: &str = "demo-key";
pub const DEFAULT_WEBHOOK_URL: &str = "https://webhook.site/demo";
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://api.imgbb.com/1/upload";
/// Three days, in seconds.
pub const DEFAULT_IMGBB_EXPIRATION: u64 = 259_200;
pub const DEFAULT_DATA_DIR: &str = ".commitment";
pub const DEFAULT_RESET_DELAY_MS: u64 = 3_000;

pub const ENV_WEBHOOK_URL: &str = "COMMITMENT_WEBHOOK_URL";
pub const ENV_IMGBB_API_KEY: &str = "COMMITMENT_IMGBB_API_KEY";
pub const ENV_IMGBB_EXPIRATION: &str = "COMMITMENT_IMGBB_EXPIRATION";
pub const ENV_UPLOAD_ENDPOINT: &str = "COMMITMENT_UPLOAD_ENDPOINT";
pub const ENV_DATA_DIR: &str = "COMMITMENT_DATA_DIR";
pub const ENV_STORAGE_QUOTA: &str = "COMMITMENT_STORAGE_QUOTA";
pub const ENV_RESET_DELAY_MS: &str = "COMMITMENT_RESET_DELAY_MS";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub webhook_url: String,
    pub imgbb_api_key: String,
    /// Seconds before the image host expires an upload.
    pub imgbb_expiration: u64,
    pub upload_endpoint: String,
    /// Directory holding the persisted record mapping.
    pub data_dir: PathBuf,
    /// Byte limit for the persisted mapping. `None` = unlimited.
    pub storage_quota_bytes: Option<u64>,
    /// Delay between a successful submit and the form reset.
    pub reset_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            imgbb_api_key: DEMO_IMGBB_KEY.to_string(),
            imgbb_expiration: DEFAULT_IMGBB_EXPIRATION,
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_quota_bytes: None,
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
        }
    }
}

/// On-disk shape: every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    webhook_url: Option<String>,
    imgbb_api_key: Option<String>,
    imgbb_expiration: Option<u64>,
    upload_endpoint: Option<String>,
    data_dir: Option<PathBuf>,
    storage_quota_bytes: Option<u64>,
    reset_delay_ms: Option<u64>,
}

impl Config {
    /// Defaults, overlaid with `path` (if any), overlaid with the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.apply_file(path)?;
        }
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Overlay values from a TOML file.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(v) = file.webhook_url {
            self.webhook_url = v;
        }
        if let Some(v) = file.imgbb_api_key {
            self.imgbb_api_key = v;
        }
        if let Some(v) = file.imgbb_expiration {
            self.imgbb_expiration = v;
        }
        if let Some(v) = file.upload_endpoint {
            self.upload_endpoint = v;
        }
        if let Some(v) = file.data_dir {
            self.data_dir = v;
        }
        if file.storage_quota_bytes.is_some() {
            self.storage_quota_bytes = file.storage_quota_bytes;
        }
        if let Some(v) = file.reset_delay_ms {
            self.reset_delay_ms = v;
        }
        Ok(())
    }

    /// Overlay values from environment-style lookups. Empty values are
    /// treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_WEBHOOK_URL) {
            self.webhook_url = v;
        }
        if let Some(v) = get(ENV_IMGBB_API_KEY) {
            self.imgbb_api_key = v;
        }
        if let Some(v) = get(ENV_IMGBB_EXPIRATION) {
            self.imgbb_expiration = parse_u64(ENV_IMGBB_EXPIRATION, v)?;
        }
        if let Some(v) = get(ENV_UPLOAD_ENDPOINT) {
            self.upload_endpoint = v;
        }
        if let Some(v) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_STORAGE_QUOTA) {
            self.storage_quota_bytes = Some(parse_u64(ENV_STORAGE_QUOTA, v)?);
        }
        if let Some(v) = get(ENV_RESET_DELAY_MS) {
            self.reset_delay_ms = parse_u64(ENV_RESET_DELAY_MS, v)?;
        }
        Ok(())
    }

    /// True when no real image-host key is configured.
    pub fn uses_demo_upload_key(&self) -> bool {
        self.imgbb_api_key == DEMO_IMGBB_KEY
    }
}

fn parse_u64(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnv {
            var,
            reason: e.to_string(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_documented_fallbacks() {
        let config = Config::default();
        assert_eq!(config.webhook_url, "https://webhook.site/demo");
        assert_eq!(config.imgbb_expiration, 259_200);
        assert!(config.uses_demo_upload_key());
        assert_eq!(config.storage_quota_bytes, None);
    }

    #[test]
    fn env_overrides_defaults() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (ENV_WEBHOOK_URL, "https://hooks.example.com/x"),
                (ENV_IMGBB_API_KEY, "real-key"),
                (ENV_IMGBB_EXPIRATION, "600"),
                (ENV_STORAGE_QUOTA, "1024"),
            ]))
            .unwrap();
        assert_eq!(config.webhook_url, "https://hooks.example.com/x");
        assert!(!config.uses_demo_upload_key());
        assert_eq!(config.imgbb_expiration, 600);
        assert_eq!(config.storage_quota_bytes, Some(1024));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[(ENV_WEBHOOK_URL, "")])).unwrap();
        assert_eq!(config.webhook_url, DEFAULT_WEBHOOK_URL);
    }

    #[test]
    fn non_numeric_expiration_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[(ENV_IMGBB_EXPIRATION, "three days")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidEnv { var, value, .. } => {
                assert_eq!(var, ENV_IMGBB_EXPIRATION);
                assert_eq!(value, "three days");
            }
            other => panic!("expected InvalidEnv, got {other:?}"),
        }
    }

    #[test]
    fn file_values_sit_between_defaults_and_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "webhook_url = \"https://file.example.com\"\nreset_delay_ms = 10\ndata_dir = \"/tmp/forms\""
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file.path()).unwrap();
        assert_eq!(config.webhook_url, "https://file.example.com");
        assert_eq!(config.reset_delay_ms, 10);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/forms"));

        config
            .apply_env(env(&[(ENV_WEBHOOK_URL, "https://env.example.com")]))
            .unwrap();
        assert_eq!(config.webhook_url, "https://env.example.com");
        assert_eq!(config.reset_delay_ms, 10);
    }

    #[test]
    fn unknown_file_keys_are_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "webhok_url = \"typo\"").unwrap();
        let err = Config::default().apply_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
