use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::render::pdf::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Remote text generation. Default: `LlmClient` (Anthropic Messages API).
    pub llm: Arc<dyn TextGenerator>,
    /// HTML → PDF engine, chosen via PDF_ENGINE.
    pub pdf: Arc<dyn PdfRenderer>,
    pub config: Config,
}
