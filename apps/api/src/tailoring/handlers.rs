//! Axum route handlers for the Tailoring API: tailor, render PDF, download.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::job_descriptions::handlers::fetch_job_description;
use crate::models::tailored_resume::TailoredResumeRow;
use crate::render::template::render_html;
use crate::render::to_render_data;
use crate::resumes::handlers::fetch_resume;
use crate::state::AppState;
use crate::storage;
use crate::tailoring::keywords::KeywordBundle;
use crate::tailoring::orchestrator::tailor;
use crate::tailoring::sections::SectionMap;

const PREVIEW_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TailoringRequest {
    pub resume_id: Uuid,
    pub job_description_id: Uuid,
    #[serde(default = "default_true")]
    pub preserve_formatting: bool,
    /// Recorded in the log only; tailoring always aims at one page.
    #[serde(default = "default_target_length")]
    pub target_length: String,
}

fn default_true() -> bool {
    true
}

fn default_target_length() -> String {
    "one_page".to_string()
}

#[derive(Debug, Serialize)]
pub struct TailoringResponse {
    pub success: bool,
    pub message: String,
    pub tailored_resume_id: Option<Uuid>,
    pub preview_content: Option<String>,
    pub estimated_pages: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub message: String,
    pub download_url: Option<String>,
    pub filename: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/tailor-resume
///
/// Tailors a stored resume for a stored job description and records the
/// result. Model failures fall back to local tailoring, never to an error.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(request): Json<TailoringRequest>,
) -> Result<Json<TailoringResponse>, AppError> {
    let resume = fetch_resume(&state, request.resume_id).await?;
    let job = fetch_job_description(&state, request.job_description_id).await?;

    let keywords = stored_keywords(job.extracted_keywords.as_ref());

    let result = tailor(
        state.llm.as_ref(),
        &resume.parsed_content,
        &job.content,
        &keywords,
        request.preserve_formatting,
    )
    .await;

    let tailored_content = result.sections.compose();
    let sections_value = serde_json::to_value(&result.sections)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize sections: {e}")))?;

    let tailored_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO tailored_resumes
            (id, resume_id, job_description_id, tailored_content, tailored_sections, is_one_page)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(tailored_id)
    .bind(resume.id)
    .bind(job.id)
    .bind(&tailored_content)
    .bind(&sections_value)
    .bind(result.is_one_page())
    .execute(&state.db)
    .await?;

    info!(
        "Tailored resume {} for job {} -> {} ({:?}, {:.1} pages, target {})",
        resume.id,
        job.id,
        tailored_id,
        result.source,
        result.estimated_pages,
        request.target_length
    );

    Ok(Json(TailoringResponse {
        success: true,
        message: "Resume tailored successfully".to_string(),
        tailored_resume_id: Some(tailored_id),
        preview_content: Some(preview(&tailored_content)),
        estimated_pages: Some(result.estimated_pages),
    }))
}

/// POST /api/generate-pdf/:id
///
/// Renders the tailored sections through the HTML template and PDF engine,
/// stores the PDF and attaches it to the tailored resume.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Path(tailored_id): Path<Uuid>,
) -> Result<Json<DownloadResponse>, AppError> {
    let tailored = fetch_tailored_resume(&state, tailored_id).await?;

    let sections = stored_sections(&tailored);
    let html = render_html(&to_render_data(&sections))?;
    let pdf = state.pdf.render(&html).await?;

    let filename = storage::pdf_filename();
    storage::put_object(
        &state.s3,
        &state.config.s3_bucket,
        &storage::pdf_key(&filename),
        Bytes::from(pdf),
        "application/pdf",
    )
    .await?;

    sqlx::query("UPDATE tailored_resumes SET pdf_path = $1 WHERE id = $2")
        .bind(&filename)
        .bind(tailored_id)
        .execute(&state.db)
        .await?;

    if let Some(previous) = superseded_pdf(tailored.pdf_path.as_deref(), &filename) {
        let key = storage::pdf_key(previous);
        if let Err(e) = storage::delete_object(&state.s3, &state.config.s3_bucket, &key).await {
            warn!("Could not remove superseded PDF {key}: {e}");
        }
    }

    info!("Generated PDF {} for tailored resume {}", filename, tailored_id);

    Ok(Json(DownloadResponse {
        success: true,
        message: "PDF generated successfully".to_string(),
        download_url: Some(format!("/api/download/{tailored_id}")),
        filename: Some(filename),
    }))
}

/// GET /api/download/:id
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(tailored_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let tailored = fetch_tailored_resume(&state, tailored_id).await?;
    let filename = tailored
        .pdf_path
        .ok_or_else(|| AppError::NotFound("PDF not generated yet".to_string()))?;

    let pdf = storage::get_object(
        &state.s3,
        &state.config.s3_bucket,
        &storage::pdf_key(&filename),
    )
    .await?;

    let disposition = format!("attachment; filename=\"tailored_resume_{tailored_id}.pdf\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

/// GET /api/tailored-resumes
pub async fn handle_list_tailored_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<TailoredResumeRow>>, AppError> {
    let rows = sqlx::query_as::<_, TailoredResumeRow>(
        "SELECT * FROM tailored_resumes ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/tailored-resume/:id
pub async fn handle_get_tailored_resume(
    State(state): State<AppState>,
    Path(tailored_id): Path<Uuid>,
) -> Result<Json<TailoredResumeRow>, AppError> {
    Ok(Json(fetch_tailored_resume(&state, tailored_id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn fetch_tailored_resume(
    state: &AppState,
    tailored_id: Uuid,
) -> Result<TailoredResumeRow, AppError> {
    sqlx::query_as::<_, TailoredResumeRow>("SELECT * FROM tailored_resumes WHERE id = $1")
        .bind(tailored_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tailored resume not found".to_string()))
}

/// Keyword bundle stored with a job description; an absent or unreadable
/// bundle tailors with no keywords.
fn stored_keywords(stored: Option<&serde_json::Value>) -> KeywordBundle {
    let Some(value) = stored else {
        return KeywordBundle::default();
    };
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!("Stored keyword bundle unreadable, tailoring without keywords: {e}");
        KeywordBundle::default()
    })
}

/// Sections saved at tailoring time; rows that cannot be read back render
/// their combined text as the experience block.
fn stored_sections(tailored: &TailoredResumeRow) -> SectionMap {
    serde_json::from_value(tailored.tailored_sections.clone()).unwrap_or_else(|e| {
        warn!(
            "Tailored resume {} has unreadable sections ({e}), rendering combined text",
            tailored.id
        );
        SectionMap {
            experience: tailored.tailored_content.clone(),
            ..SectionMap::default()
        }
    })
}

/// PDF left behind when a tailored resume gets a newly generated one.
fn superseded_pdf<'a>(previous: Option<&'a str>, current: &str) -> Option<&'a str> {
    previous.filter(|name| !name.is_empty() && *name != current)
}

/// First `PREVIEW_CHARS` characters, with "..." when truncated.
fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}
