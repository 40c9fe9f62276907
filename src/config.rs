use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

const DEFAULT_ALLOWED_ORIGIN: &str = "https://image-gen-frontend-topaz.vercel.app";
const DEFAULT_GENERATION_URL: &str = "https://api.openai.com/v1/images/generations";
const DEFAULT_EDIT_URL: &str = "https://api.openai.com/v1/images/edits";

#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// The single origin allowed to call the API from a browser.
    pub allowed_origin: String,
    pub body_limit_bytes: usize,
    pub openai_api_key: String,
    pub generation_url: String,
    pub edit_url: String,
    /// Size requested from the generation endpoint.
    pub image_size: String,
    pub upstream_timeout: Duration,
    pub request_timeout: Duration,
    pub posts_table_name: String,
    pub aws_region: String,
    // Optional endpoint for LocalStack
    pub store_endpoint: Option<String>,
}

// The API key must never end up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("allowed_origin", &self.allowed_origin)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .field("openai_api_key", &"[REDACTED]")
            .field("generation_url", &self.generation_url)
            .field("edit_url", &self.edit_url)
            .field("image_size", &self.image_size)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("posts_table_name", &self.posts_table_name)
            .field("aws_region", &self.aws_region)
            .field("store_endpoint", &self.store_endpoint)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_address = parse_var("BIND_ADDRESS", &or_default("BIND_ADDRESS", "0.0.0.0:8080"))?;
        let body_limit_bytes = parse_var("BODY_LIMIT_BYTES", &or_default("BODY_LIMIT_BYTES", "52428800"))?;

        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".into()))?;

        let upstream_timeout_secs: u64 =
            parse_var("UPSTREAM_TIMEOUT_SECS", &or_default("UPSTREAM_TIMEOUT_SECS", "120"))?;
        let request_timeout_secs: u64 =
            parse_var("REQUEST_TIMEOUT_SECS", &or_default("REQUEST_TIMEOUT_SECS", "180"))?;

        Ok(Config {
            bind_address,
            allowed_origin: or_default("ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN),
            body_limit_bytes,
            openai_api_key,
            generation_url: or_default("IMAGE_GENERATION_URL", DEFAULT_GENERATION_URL),
            edit_url: or_default("IMAGE_EDIT_URL", DEFAULT_EDIT_URL),
            image_size: or_default("IMAGE_SIZE", "1024x1024"),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            posts_table_name: or_default("POSTS_TABLE_NAME", "posts"),
            aws_region: or_default("AWS_DEFAULT_REGION", "us-east-1"),
            store_endpoint: lookup("AWS_ENDPOINT_URL"),
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(raw.trim()).map_err(|e| ConfigError::InvalidVar(key.into(), e.to_string()))
}
