use anyhow::{anyhow, Context, Result};

use crate::render::pdf::PdfEngine;

const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_LLM_MAX_TOKENS: u32 = 4000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub llm_max_tokens: u32,
    /// Upper bound for uploaded resume files, in bytes.
    pub max_file_size: usize,
    pub pdf_engine: PdfEngine,
    pub cors_allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: optional_env("S3_REGION", "us-east-1"),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_max_tokens: optional_env("LLM_MAX_TOKENS", &DEFAULT_LLM_MAX_TOKENS.to_string())
                .parse::<u32>()
                .context("LLM_MAX_TOKENS must be a positive integer")?,
            max_file_size: optional_env("MAX_FILE_SIZE", &DEFAULT_MAX_FILE_SIZE.to_string())
                .parse::<usize>()
                .context("MAX_FILE_SIZE must be a size in bytes")?,
            pdf_engine: optional_env("PDF_ENGINE", "wkhtmltopdf")
                .parse::<PdfEngine>()
                .map_err(|e| anyhow!("PDF_ENGINE must be 'wkhtmltopdf' or 'weasyprint': {e}"))?,
            cors_allowed_origins: parse_origins(&optional_env(
                "CORS_ALLOWED_ORIGINS",
                DEFAULT_CORS_ORIGINS,
            )),
            port: optional_env("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins(" http://localhost:3000 , http://127.0.0.1:3000,, ");
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn test_default_origins_cover_local_frontend() {
        let origins = parse_origins(DEFAULT_CORS_ORIGINS);
        assert_eq!(origins.len(), 2);
        assert!(origins.iter().all(|o| o.ends_with(":3000")));
    }
}
