use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub content: String,
    /// Serialized `KeywordBundle`.
    pub extracted_keywords: Option<Value>,
    /// `{ "required": [...], "preferred": [...] }`
    pub requirements: Option<Value>,
    pub created_at: DateTime<Utc>,
}
