/// Configuration management for asset-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub cache: CachePolicyConfig,
    pub s3: S3Config,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
    /// Base URL under which stored assets are publicly addressable.
    /// The address for an identifier is `{public_base_url}/{identifier}.png`.
    pub public_base_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to use the legacy `POST /upload` route.
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CachePolicyConfig {
    /// Cache-Control max-age for retrieval responses, in seconds.
    ///
    /// Keys are overwritable (last write wins), so the default keeps
    /// staleness bounded at a few seconds. Deployments that treat keys as
    /// immutable may raise this to a year.
    pub max_age_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("ASSET_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("ASSET_SERVICE_PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .unwrap_or(5000),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                public_base_url: std::env::var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:5000".to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },
            cors: CorsConfig {
                allowed_origins: parse_allowed_origins(),
            },
            cache: CachePolicyConfig {
                max_age_secs: std::env::var("CACHE_MAX_AGE_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            s3: S3Config {
                bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "asset-uploads".to_string()),
                region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
                endpoint: std::env::var("S3_ENDPOINT").ok(),
            },
        })
    }
}

fn parse_allowed_origins() -> Vec<String> {
    std::env::var("UPLOAD_ALLOWED_ORIGINS")
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()])
}
