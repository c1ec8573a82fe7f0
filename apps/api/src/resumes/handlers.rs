//! Axum route handlers for the Resume API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::document::parse_upload;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::routes::ActionResponse;
use crate::state::AppState;
use crate::storage;

/// Multipart field carrying the resume file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_id: Option<Uuid>,
    pub filename: Option<String>,
}

/// POST /api/upload-resume
///
/// Accepts a `.pdf`, `.docx` or `.txt` file, extracts its text, stores the
/// original in object storage and records it.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    let max = state.config.max_file_size;
    if data.len() > max {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size: {}MB",
            max / (1024 * 1024)
        )));
    }

    let parsed = parse_upload(filename.clone(), data.clone()).await?;

    let file_path = storage::upload_key(&filename, chrono::Utc::now());
    storage::put_object(
        &state.s3,
        &state.config.s3_bucket,
        &file_path,
        data,
        content_type_for(parsed.file_type.as_str()),
    )
    .await?;

    let inserted = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, filename, original_content, parsed_content, file_path, file_type)
        VALUES ($1, $2, $3, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&filename)
    .bind(&parsed.content)
    .bind(&file_path)
    .bind(parsed.file_type.as_str())
    .fetch_one(&state.db)
    .await;

    let resume = match inserted {
        Ok(row) => row,
        Err(e) => {
            if let Err(cleanup) =
                storage::delete_object(&state.s3, &state.config.s3_bucket, &file_path).await
            {
                warn!("Could not remove orphaned upload {file_path}: {cleanup}");
            }
            return Err(e.into());
        }
    };

    info!(
        "Uploaded resume {} ({}, {} pages, {} chars)",
        resume.id,
        resume.file_type,
        parsed.pages,
        resume.parsed_content.len()
    );

    Ok(Json(UploadResponse {
        success: true,
        message: "Resume uploaded and parsed successfully".to_string(),
        file_id: Some(resume.id),
        filename: Some(filename),
    }))
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let resumes =
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(resumes))
}

/// GET /api/resume/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(fetch_resume(&state, resume_id).await?))
}

/// DELETE /api/resume/:id
///
/// Removes the stored file, then the row.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    let resume = fetch_resume(&state, resume_id).await?;

    storage::delete_object(&state.s3, &state.config.s3_bucket, &resume.file_path).await?;

    sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(resume_id)
        .execute(&state.db)
        .await?;

    info!("Deleted resume {resume_id}");
    Ok(Json(ActionResponse::ok("Resume deleted successfully")))
}

pub async fn fetch_resume(state: &AppState, resume_id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}

/// Pulls the first `file` field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart body"))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(String::from)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Could not read uploaded file"))?;

        return Ok((filename, data));
    }

    Err(AppError::Validation("No resume file provided".to_string()))
}

/// Bodies cut off by the request size limit are a 413, anything else a 400.
fn multipart_error(err: MultipartError, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum request size".to_string())
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

fn content_type_for(file_type: &str) -> &'static str {
    match file_type {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "text/plain; charset=utf-8",
    }
}
