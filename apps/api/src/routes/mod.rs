pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::job_descriptions::handlers as job_descriptions;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

/// Room for multipart framing on top of the file itself; the upload handler
/// enforces the exact file-size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Body of endpoints that only report whether an action succeeded.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: &str) -> Self {
        ActionResponse {
            success: true,
            message: message.to_string(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Resumes
        .route("/api/upload-resume", post(resumes::handle_upload_resume))
        .route("/api/resumes", get(resumes::handle_list_resumes))
        .route(
            "/api/resume/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        // Job descriptions
        .route(
            "/api/upload-job-description",
            post(job_descriptions::handle_upload_job_description),
        )
        .route(
            "/api/job-descriptions",
            get(job_descriptions::handle_list_job_descriptions),
        )
        .route(
            "/api/job-description/:id",
            get(job_descriptions::handle_get_job_description)
                .delete(job_descriptions::handle_delete_job_description),
        )
        .route(
            "/api/job-description/:id/keywords",
            get(job_descriptions::handle_get_job_keywords),
        )
        // Tailoring and PDF output
        .route("/api/tailor-resume", post(tailoring::handle_tailor_resume))
        .route("/api/generate-pdf/:id", post(tailoring::handle_generate_pdf))
        .route("/api/download/:id", get(tailoring::handle_download_pdf))
        .route(
            "/api/tailored-resumes",
            get(tailoring::handle_list_tailored_resumes),
        )
        .route(
            "/api/tailored-resume/:id",
            get(tailoring::handle_get_tailored_resume),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::render::pdf::{PdfEngine, PdfRenderer};
    use crate::render::RenderError;

    struct NoModel;

    #[async_trait]
    impl TextGenerator for NoModel {
        async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    struct NoPdf;

    #[async_trait]
    impl PdfRenderer for NoPdf {
        async fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
            Ok(Vec::new())
        }
    }

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/unused".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_region: "us-east-1".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            llm_max_tokens: 4000,
            max_file_size: 1024,
            pdf_engine: PdfEngine::Wkhtmltopdf,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            port: 8000,
            rust_log: "info".to_string(),
        }
    }

    /// Router over a pool that never connects; only requests rejected before
    /// touching the database are exercised.
    fn test_router() -> Router {
        let config = test_config();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let state = AppState {
            db,
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            llm: Arc::new(NoModel),
            pdf: Arc::new(NoPdf),
            config,
        };
        build_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_request(field: &str, filename: &str, content: &str) -> Request<Body> {
        let boundary = "resume-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/upload-resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Resume Optimizer API is running!"
        );

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "resume-optimizer");
    }

    #[tokio::test]
    async fn test_job_description_validation_error() {
        let request = Request::post("/api/upload-job-description")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "title": "", "company": "Acme", "content": "Build APIs in Rust" })
                    .to_string(),
            ))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_extension() {
        let response = test_router()
            .oneshot(multipart_request("file", "resume.exe", "MZ"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "UNSUPPORTED_FORMAT"
        );
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let response = test_router()
            .oneshot(multipart_request("attachment", "resume.txt", "Jane Doe"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let content = "x".repeat(2048);
        let response = test_router()
            .oneshot(multipart_request("file", "resume.txt", &content))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_above_body_limit_is_payload_too_large() {
        // max_file_size (1024) + MULTIPART_OVERHEAD is exceeded by the body itself.
        let content = "x".repeat(1024 + 70 * 1024);
        let response = test_router()
            .oneshot(multipart_request("file", "resume.txt", &content))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "PAYLOAD_TOO_LARGE"
        );
    }

    #[tokio::test]
    async fn test_upload_of_broken_pdf_is_unprocessable() {
        let pdf = String::from_utf8(crate::document::pdf_with_undefined_font()).unwrap();
        let response = test_router()
            .oneshot(multipart_request("file", "resume.pdf", &pdf))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "DOCUMENT_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_router()
            .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
