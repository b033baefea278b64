//! API configuration.

use std::fmt;
use std::path::PathBuf;

use liveportrait_inference::InferenceClientConfig;
use liveportrait_models::Credential;

/// Default request body ceiling; multipart uploads carry a whole video.
pub const DEFAULT_MAX_BODY_SIZE: usize = 100 * 1024 * 1024;

/// API server configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Operator-configured credential for the inference service
    pub api_key: Option<Credential>,
    /// Directory the example assets are served from
    pub assets_dir: PathBuf,
    /// Outbound inference client settings
    pub inference: InferenceClientConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            environment: "development".to_string(),
            api_key: None,
            assets_dir: PathBuf::from("public"),
            inference: InferenceClientConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            api_key: std::env::var("HUGGINGFACE_API_KEY")
                .ok()
                .and_then(|s| Credential::parse(&s)),
            assets_dir: std::env::var("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            inference: InferenceClientConfig::from_env(),
        }
    }

    /// Set the server-side credential.
    pub fn with_api_key(mut self, api_key: Option<Credential>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Pick the credential for one request; a per-request value wins.
    pub fn resolve_credential(&self, per_request: Option<Credential>) -> Option<Credential> {
        per_request.or_else(|| self.api_key.clone())
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_size", &self.max_body_size)
            .field("environment", &self.environment)
            .field("api_key_configured", &self.api_key.is_some())
            .field("assets_dir", &self.assets_dir)
            .field("inference", &self.inference)
            .finish()
    }
}
