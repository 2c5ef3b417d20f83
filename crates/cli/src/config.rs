use anyhow::{Context, Result};
use api_client::normalize_base_url;
use profile_data::UserId;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 8000;
pub const DEFAULT_LIKE_EFFECT_MS: u64 = 2000;
pub const DEFAULT_PASS_EFFECT_MS: u64 = 1500;
pub const DEFAULT_TRANSITION_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_STORE_PATH: &str = ".swipe-connect/store.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    /// `None` runs the queue offline on the placeholder set
    pub viewer_id: Option<UserId>,
    pub request_timeout: Duration,
    pub like_effect: Duration,
    pub pass_effect: Duration,
    pub transition_timeout: Duration,
    pub store_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_base_url: normalize_base_url(&get("API_BASE_URL").unwrap_or_default()),
            api_token: get("API_TOKEN"),
            viewer_id: get("VIEWER_ID")
                .map(|v| parse_number::<UserId>("VIEWER_ID", &v))
                .transpose()?,
            request_timeout: millis(&get, "REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?,
            like_effect: millis(&get, "LIKE_EFFECT_MS", DEFAULT_LIKE_EFFECT_MS)?,
            pass_effect: millis(&get, "PASS_EFFECT_MS", DEFAULT_PASS_EFFECT_MS)?,
            transition_timeout: millis(&get, "TRANSITION_TIMEOUT_MS", DEFAULT_TRANSITION_TIMEOUT_MS)?,
            store_path: get("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
        })
    }
}

fn millis<G>(get: &G, key: &str, default: u64) -> Result<Duration>
where
    G: Fn(&str) -> Option<String>,
{
    let ms = match get(key) {
        Some(raw) => parse_number::<u64>(key, &raw)?,
        None => default,
    };
    Ok(Duration::from_millis(ms))
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be a number, got {:?}", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.api_token, None);
        assert_eq!(config.viewer_id, None);
        assert_eq!(config.request_timeout, Duration::from_millis(8000));
        assert_eq!(config.like_effect, Duration::from_millis(2000));
        assert_eq!(config.pass_effect, Duration::from_millis(1500));
        assert_eq!(config.transition_timeout, Duration::from_millis(5000));
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("API_BASE_URL", "api.example.com/"),
            ("API_TOKEN", "abc"),
            ("VIEWER_ID", " 42 "),
            ("LIKE_EFFECT_MS", "600"),
            ("STORE_PATH", "/tmp/s.json"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.viewer_id, Some(42));
        assert_eq!(config.like_effect, Duration::from_millis(600));
        assert_eq!(config.store_path, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_blank_viewer_is_offline_and_garbage_is_an_error() {
        assert_eq!(config(&[("VIEWER_ID", "  ")]).unwrap().viewer_id, None);

        let err = config(&[("VIEWER_ID", "me")]).unwrap_err();
        assert!(err.to_string().contains("VIEWER_ID"));
    }
}
