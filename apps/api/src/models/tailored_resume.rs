use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TailoredResumeRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_description_id: Uuid,
    pub tailored_content: String,
    /// Serialized `SectionMap` the content was composed from.
    pub tailored_sections: Value,
    /// File name of the generated PDF, once rendered.
    pub pdf_path: Option<String>,
    pub is_one_page: bool,
    pub created_at: DateTime<Utc>,
}
