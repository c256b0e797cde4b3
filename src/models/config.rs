//! Application configuration structures.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that seeds the session cookie at startup.
pub const COOKIE_ENV: &str = "PORTAL_COOKIE";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Student portal locations
    #[serde(default)]
    pub portal: PortalConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// On-disk layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP surface settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Initial session state
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Session cookie to start with: environment first, then the config file.
    pub fn initial_cookie(&self) -> Option<String> {
        std::env::var(COOKIE_ENV)
            .ok()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.session.cookie.clone())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.portal.base_url)
            .map_err(|e| AppError::validation(format!("portal.base_url: {e}")))?;
        url::Url::parse(&self.portal.courses_url)
            .map_err(|e| AppError::validation(format!("portal.courses_url: {e}")))?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.text_timeout_secs == 0
            || self.http.binary_timeout_secs == 0
            || self.http.proxy_timeout_secs == 0
        {
            return Err(AppError::validation("http timeouts must be > 0"));
        }
        if self.paths.html_dir == self.paths.courses_dir {
            return Err(AppError::validation(
                "paths.html_dir and paths.courses_dir must differ",
            ));
        }
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|e| AppError::validation(format!("server.bind: {e}")))?;
        Ok(())
    }
}

/// Student portal locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base for resolving relative links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Page holding the main course table
    #[serde(default = "defaults::base_url")]
    pub courses_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            courses_url: defaults::base_url(),
        }
    }
}

/// HTTP client behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Timeout for HTML pages
    #[serde(default = "defaults::text_timeout")]
    pub text_timeout_secs: u64,

    /// Timeout for file downloads
    #[serde(default = "defaults::binary_timeout")]
    pub binary_timeout_secs: u64,

    /// Timeout for reverse-proxy passthrough
    #[serde(default = "defaults::proxy_timeout")]
    pub proxy_timeout_secs: u64,

    /// Redirect hops followed per request
    #[serde(default = "defaults::max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            text_timeout_secs: defaults::text_timeout(),
            binary_timeout_secs: defaults::binary_timeout(),
            proxy_timeout_secs: defaults::proxy_timeout(),
            max_redirects: defaults::max_redirects(),
        }
    }
}

/// On-disk layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Scratch tree: raw fetched pages, the refetch cache
    #[serde(default = "defaults::html_dir")]
    pub html_dir: PathBuf,

    /// Output tree: canonical syllabi and downloaded materials
    #[serde(default = "defaults::courses_dir")]
    pub courses_dir: PathBuf,

    #[serde(default = "defaults::templates_dir")]
    pub templates_dir: PathBuf,

    #[serde(default = "defaults::template_name")]
    pub template_name: String,

    /// Generated dashboard
    #[serde(default = "defaults::index_html")]
    pub index_html: PathBuf,
}

impl PathsConfig {
    pub fn template_path(&self) -> PathBuf {
        self.templates_dir.join(&self.template_name)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            html_dir: defaults::html_dir(),
            courses_dir: defaults::courses_dir(),
            templates_dir: defaults::templates_dir(),
            template_name: defaults::template_name(),
            index_html: defaults::index_html(),
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
        }
    }
}

/// Initial session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub cookie: Option<String>,
}

mod defaults {
    use std::path::PathBuf;

    pub fn base_url() -> String {
        "https://classroom.btu.edu.ge/en/student/me/courses".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
    }
    pub fn text_timeout() -> u64 {
        30
    }
    pub fn binary_timeout() -> u64 {
        60
    }
    pub fn proxy_timeout() -> u64 {
        120
    }
    pub fn max_redirects() -> usize {
        10
    }

    // Path defaults
    pub fn html_dir() -> PathBuf {
        "html".into()
    }
    pub fn courses_dir() -> PathBuf {
        "courses".into()
    }
    pub fn templates_dir() -> PathBuf {
        "templates".into()
    }
    pub fn template_name() -> String {
        "template.html".into()
    }
    pub fn index_html() -> PathBuf {
        "index.html".into()
    }

    pub fn bind() -> String {
        "127.0.0.1:8000".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_shared_trees() {
        let mut config = Config::default();
        config.paths.courses_dir = config.paths.html_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_bind() {
        let mut config = Config::default();
        config.server.bind = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [http]
            text_timeout_secs = 5

            [session]
            cookie = "sid=abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.http.text_timeout_secs, 5);
        assert_eq!(config.http.binary_timeout_secs, 60);
        assert_eq!(config.paths.html_dir, PathBuf::from("html"));
        assert_eq!(config.session.cookie.as_deref(), Some("sid=abc"));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = Config::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn template_path_joins_dir_and_name() {
        let paths = PathsConfig::default();
        assert_eq!(
            paths.template_path(),
            PathBuf::from("templates").join("template.html")
        );
    }
}
