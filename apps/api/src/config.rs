use anyhow::{Context, Result};

/// Default model for live applicant summaries when `GENAI_MODEL` is unset.
pub const DEFAULT_GENAI_MODEL: &str = "claude-sonnet-4-5";

/// Connection settings for the row-level-secured REST backend.
///
/// Passed into [`crate::backend::Dispatcher`] at construction; nothing in the
/// backend layer reads the environment at call time.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// REST root, e.g. `https://project.example.co/rest/v1`.
    pub base_url: String,
    /// Already-issued bearer credential for the signed-in user.
    pub access_token: String,
    /// Identity merged into every mutating body.
    pub username: String,
    /// Project key some backends require alongside the bearer token.
    pub api_key: Option<String>,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(BackendConfig {
            base_url: require_env("BACKEND_URL")?,
            access_token: require_env("BACKEND_ACCESS_TOKEN")?,
            username: require_env("BACKEND_USERNAME")?,
            api_key: optional_env("BACKEND_API_KEY"),
        })
    }
}

/// Summarization gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// `None` selects the placeholder branch.
    pub genai_api_key: Option<String>,
    pub genai_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(GatewayConfig {
            genai_api_key: optional_env("GENAI_API_KEY"),
            genai_model: optional_env("GENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_GENAI_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn live_generation_enabled(&self) -> bool {
        self.genai_api_key.is_some()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            genai_api_key: None,
            genai_model: DEFAULT_GENAI_MODEL.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    normalize_optional(std::env::var(key).ok())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
