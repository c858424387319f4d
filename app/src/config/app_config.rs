//! Redirect server configuration loaded from the environment.

use std::path::PathBuf;

use super::defaults;
use super::validation::validate_short_path;

/// Runtime configuration for the redirect server.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub redirect_file: PathBuf,
    pub redirect_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.into(),
            port: defaults::SERVER_PORT,
            redirect_file: PathBuf::from(defaults::REDIRECT_FILE),
            redirect_path: defaults::REDIRECT_PATH.into(),
        }
    }
}

impl AppConfig {
    /// Load from `HOST`, `PORT`, `REDIRECT_FILE` and `REDIRECT_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset, empty or invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let host = non_empty_or(g("HOST"), defaults::SERVER_HOST);
        let port = parse_u16(&g("PORT"), defaults::SERVER_PORT);
        let redirect_file = PathBuf::from(non_empty_or(g("REDIRECT_FILE"), defaults::REDIRECT_FILE));

        let raw_path = g("REDIRECT_PATH");
        let raw_path = raw_path.trim_matches('/');
        let redirect_path = if raw_path.is_empty() {
            defaults::REDIRECT_PATH.to_string()
        } else if let Err(e) = validate_short_path(raw_path) {
            tracing::warn!("Ignoring REDIRECT_PATH={raw_path:?}: {e}");
            defaults::REDIRECT_PATH.to_string()
        } else {
            raw_path.to_string()
        };

        Self {
            host,
            port,
            redirect_file,
            redirect_path,
        }
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() { default.to_string() } else { value }
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
