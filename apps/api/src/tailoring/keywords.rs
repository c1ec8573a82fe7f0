//! Keyword Extractor: turns job-description text into a `KeywordBundle`.
//!
//! The model is asked first; `extract_keywords_fallback` scans fixed
//! vocabularies when the call fails or returns nothing usable.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::{extract_json_object, JsonExtraction, TextGenerator};
use crate::tailoring::prompts::{fill_template, KEYWORD_EXTRACTION_PROMPT_TEMPLATE};

const EXTRACTION_TEMPERATURE: f32 = 0.3;

const TECHNICAL_VOCABULARY: &[&str] = &[
    "python",
    "javascript",
    "java",
    "react",
    "node.js",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "machine learning",
    "ai",
    "data analysis",
    "agile",
    "scrum",
];

const SOFT_SKILL_VOCABULARY: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "analytical",
    "project management",
    "customer service",
    "sales",
    "marketing",
];

pub const DEFAULT_EXPERIENCE_LEVEL: &str = "mid";
pub const DEFAULT_JOB_CATEGORY: &str = "general";

/// Structured keywords and requirements derived from a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordBundle {
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub required_qualifications: Vec<String>,
    #[serde(default)]
    pub preferred_qualifications: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub industry_keywords: Vec<String>,
    #[serde(default = "default_experience_level")]
    pub experience_level: String,
    #[serde(default = "default_job_category")]
    pub job_category: String,
}

impl Default for KeywordBundle {
    fn default() -> Self {
        Self {
            technical_skills: Vec::new(),
            required_qualifications: Vec::new(),
            preferred_qualifications: Vec::new(),
            responsibilities: Vec::new(),
            industry_keywords: Vec::new(),
            experience_level: default_experience_level(),
            job_category: default_job_category(),
        }
    }
}

/// Required/preferred split stored next to a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    pub required: Vec<String>,
    pub preferred: Vec<String>,
}

impl KeywordBundle {
    pub fn requirements(&self) -> Requirements {
        Requirements {
            required: self.required_qualifications.clone(),
            preferred: self.preferred_qualifications.clone(),
        }
    }
}

fn default_experience_level() -> String {
    DEFAULT_EXPERIENCE_LEVEL.to_string()
}

fn default_job_category() -> String {
    DEFAULT_JOB_CATEGORY.to_string()
}

/// Asks the model for a keyword bundle; never fails.
pub async fn extract_keywords(generator: &dyn TextGenerator, job_text: &str) -> KeywordBundle {
    let prompt = fill_template(
        KEYWORD_EXTRACTION_PROMPT_TEMPLATE,
        &[("job_description", job_text)],
    );

    let response = match generator.generate(&prompt, EXTRACTION_TEMPERATURE).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Keyword extraction call failed, using vocabulary scan: {e}");
            return extract_keywords_fallback(job_text);
        }
    };

    match extract_json_object::<KeywordBundle>(&response) {
        JsonExtraction::Parsed(bundle) => {
            info!(
                "Extracted {} technical skills via model",
                bundle.technical_skills.len()
            );
            bundle
        }
        JsonExtraction::Fallback(reason) => {
            warn!("Keyword extraction output unusable ({reason}), using vocabulary scan");
            extract_keywords_fallback(job_text)
        }
    }
}

/// Substring scan against the fixed vocabularies. Pure and total.
pub fn extract_keywords_fallback(job_text: &str) -> KeywordBundle {
    let lower = job_text.to_lowercase();
    let found = |vocabulary: &[&str]| -> Vec<String> {
        vocabulary
            .iter()
            .filter(|term| lower.contains(*term))
            .map(|term| term.to_string())
            .collect()
    };

    KeywordBundle {
        technical_skills: found(TECHNICAL_VOCABULARY),
        industry_keywords: found(SOFT_SKILL_VOCABULARY),
        ..KeywordBundle::default()
    }
}
