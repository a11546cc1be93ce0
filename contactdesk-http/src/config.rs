use std::path::PathBuf;

/// Static site settings, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Directory served as the static site, if it exists.
    pub public_dir: PathBuf,
    /// Absolute base URL used in sitemap.xml and robots.txt (no trailing slash).
    pub site_url: String,
    /// `Cache-Control` max-age for static and generated site responses (seconds).
    pub cache_max_age: u64,
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self {
            public_dir: PathBuf::from(
                std::env::var("CONTACTDESK_PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string()),
            ),
            site_url: std::env::var("CONTACTDESK_SITE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            cache_max_age: std::env::var("CONTACTDESK_CACHE_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }

    /// Config for tests: explicit dir and URL, one-hour caching.
    pub fn new(public_dir: impl Into<PathBuf>, site_url: &str) -> Self {
        Self {
            public_dir: public_dir.into(),
            site_url: site_url.trim_end_matches('/').to_string(),
            cache_max_age: 3600,
        }
    }
}

/// Listener and limits.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub max_body_kb: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("CONTACTDESK_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            data_dir: PathBuf::from(
                std::env::var("CONTACTDESK_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            ),
            max_body_kb: std::env::var("CONTACTDESK_MAX_BODY_KB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
        }
    }
}
