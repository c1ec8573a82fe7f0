//! Axum route handlers for the Job Description API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_description::JobDescriptionRow;
use crate::routes::ActionResponse;
use crate::state::AppState;
use crate::tailoring::keywords::extract_keywords;

const MAX_FIELD_CHARS: usize = 200;
const MIN_CONTENT_CHARS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct JobDescriptionCreate {
    pub title: String,
    pub company: String,
    pub content: String,
}

impl JobDescriptionCreate {
    fn validate(&self) -> Result<(), AppError> {
        check_length("title", &self.title, 1, Some(MAX_FIELD_CHARS))?;
        check_length("company", &self.company, 1, Some(MAX_FIELD_CHARS))?;
        check_length("content", &self.content, MIN_CONTENT_CHARS, None)
    }
}

fn check_length(field: &str, value: &str, min: usize, max: Option<usize>) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min {
        return Err(AppError::Validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if let Some(max) = max {
        if len > max {
            return Err(AppError::Validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(())
}

/// POST /api/upload-job-description
///
/// Extracts keywords (model first, vocabulary scan on failure) and stores the
/// bundle alongside the required/preferred split.
pub async fn handle_upload_job_description(
    State(state): State<AppState>,
    Json(request): Json<JobDescriptionCreate>,
) -> Result<Json<JobDescriptionRow>, AppError> {
    request.validate()?;

    let keywords = extract_keywords(state.llm.as_ref(), &request.content).await;
    let keywords_value = serde_json::to_value(&keywords)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize keywords: {e}")))?;
    let requirements_value = serde_json::to_value(keywords.requirements()).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize requirements: {e}"))
    })?;

    let job = sqlx::query_as::<_, JobDescriptionRow>(
        r#"
        INSERT INTO job_descriptions (id, title, company, content, extracted_keywords, requirements)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.title)
    .bind(&request.company)
    .bind(&request.content)
    .bind(&keywords_value)
    .bind(&requirements_value)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Stored job description {} ({} at {}) with {} technical skills",
        job.id,
        job.title,
        job.company,
        keywords.technical_skills.len()
    );

    Ok(Json(job))
}

/// GET /api/job-descriptions
pub async fn handle_list_job_descriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobDescriptionRow>>, AppError> {
    let jobs = sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(jobs))
}

/// GET /api/job-description/:id
pub async fn handle_get_job_description(
    State(state): State<AppState>,
    Path(jd_id): Path<Uuid>,
) -> Result<Json<JobDescriptionRow>, AppError> {
    Ok(Json(fetch_job_description(&state, jd_id).await?))
}

/// DELETE /api/job-description/:id
pub async fn handle_delete_job_description(
    State(state): State<AppState>,
    Path(jd_id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    let result = sqlx::query("DELETE FROM job_descriptions WHERE id = $1")
        .bind(jd_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job description not found".to_string()));
    }

    info!("Deleted job description {jd_id}");
    Ok(Json(ActionResponse::ok("Job description deleted successfully")))
}

/// GET /api/job-description/:id/keywords
pub async fn handle_get_job_keywords(
    State(state): State<AppState>,
    Path(jd_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = fetch_job_description(&state, jd_id).await?;
    Ok(Json(keywords_or_message(job.extracted_keywords)))
}

pub async fn fetch_job_description(
    state: &AppState,
    jd_id: Uuid,
) -> Result<JobDescriptionRow, AppError> {
    sqlx::query_as::<_, JobDescriptionRow>("SELECT * FROM job_descriptions WHERE id = $1")
        .bind(jd_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job description not found".to_string()))
}

fn keywords_or_message(extracted: Option<Value>) -> Value {
    match extracted {
        Some(value) if !value.is_null() => value,
        _ => json!({ "message": "No keywords extracted yet" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, company: &str, content: &str) -> JobDescriptionCreate {
        JobDescriptionCreate {
            title: title.to_string(),
            company: company.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request("Backend Engineer", "Acme", "Build APIs in Rust")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = request("", "Acme", "Build APIs in Rust").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("title")));
    }

    #[test]
    fn test_long_company_rejected() {
        let company = "x".repeat(201);
        let err = request("Engineer", &company, "Build APIs in Rust")
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("company")));
    }

    #[test]
    fn test_short_content_rejected() {
        let err = request("Engineer", "Acme", "Rust").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("content")));
    }

    #[test]
    fn test_keywords_or_message() {
        let stored = json!({ "technical_skills": ["rust"] });
        assert_eq!(keywords_or_message(Some(stored.clone())), stored);
        assert_eq!(
            keywords_or_message(None)["message"],
            "No keywords extracted yet"
        );
    }
}
