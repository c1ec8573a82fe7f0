//! Tailoring Orchestrator: rewrites resume sections against a job description.
//!
//! Flow: segment resume → build prompt → model call → extract JSON object.
//! Any failure along the way drops to `fallback_tailoring`, so `tailor`
//! always hands back all seven sections.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::{extract_json_object, JsonExtraction, TextGenerator};
use crate::tailoring::keywords::KeywordBundle;
use crate::tailoring::prompts::{
    fill_template, PRESERVE_FORMATTING_INSTRUCTION, TAILORING_PROMPT_TEMPLATE,
};
use crate::tailoring::sections::{segment, SectionMap};

const TAILORING_TEMPERATURE: f32 = 0.7;
/// Skills prepended to the skills section on the fallback path.
const MAX_FALLBACK_SKILLS: usize = 10;
const FALLBACK_ESTIMATED_PAGES: f64 = 1.0;

/// Which path produced a `TailoringResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailoringSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct TailoringResult {
    pub sections: SectionMap,
    pub word_count: usize,
    pub estimated_pages: f64,
    pub source: TailoringSource,
}

impl TailoringResult {
    /// A page estimate of at most one counts as a one-page resume.
    pub fn is_one_page(&self) -> bool {
        self.estimated_pages <= 1.0
    }
}

/// Shape of the object the tailoring prompt asks for.
#[derive(Debug, Deserialize)]
struct ModelTailoring {
    #[serde(flatten)]
    sections: SectionMap,
    #[serde(default)]
    word_count: Option<f64>,
    #[serde(default)]
    estimated_pages: Option<f64>,
}

/// Tailors `resume_text` for `job_text`. Never fails.
pub async fn tailor(
    generator: &dyn TextGenerator,
    resume_text: &str,
    job_text: &str,
    keywords: &KeywordBundle,
    preserve_formatting: bool,
) -> TailoringResult {
    let current_sections = segment(resume_text);
    let prompt = build_tailoring_prompt(job_text, keywords, &current_sections, preserve_formatting);

    let response = match generator.generate(&prompt, TAILORING_TEMPERATURE).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Tailoring call failed, using fallback tailoring: {e}");
            return fallback_tailoring(resume_text, keywords);
        }
    };

    match extract_json_object::<ModelTailoring>(&response) {
        JsonExtraction::Parsed(parsed) => {
            let word_count = parsed
                .word_count
                .filter(|w| w.is_finite() && *w >= 0.0)
                .map(|w| w.round() as usize)
                .unwrap_or_else(|| parsed.sections.word_count());
            let estimated_pages = parsed
                .estimated_pages
                .filter(|p| p.is_finite() && *p > 0.0)
                .unwrap_or(FALLBACK_ESTIMATED_PAGES);

            info!(
                "Tailored resume via model: {} words, {:.1} pages",
                word_count, estimated_pages
            );

            TailoringResult {
                sections: parsed.sections,
                word_count,
                estimated_pages,
                source: TailoringSource::Model,
            }
        }
        JsonExtraction::Fallback(reason) => {
            warn!("Tailoring output unusable ({reason}), using fallback tailoring");
            fallback_tailoring(resume_text, keywords)
        }
    }
}

/// Local tailoring: re-segment and put the top technical skills in front of
/// the skills section.
pub fn fallback_tailoring(resume_text: &str, keywords: &KeywordBundle) -> TailoringResult {
    let mut sections = segment(resume_text);

    if !keywords.technical_skills.is_empty() {
        let skills_line = keywords
            .technical_skills
            .iter()
            .take(MAX_FALLBACK_SKILLS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        sections.skills = format!("Technical Skills: {skills_line}\n{}", sections.skills);
    }

    TailoringResult {
        sections,
        word_count: resume_text.split_whitespace().count(),
        estimated_pages: FALLBACK_ESTIMATED_PAGES,
        source: TailoringSource::Fallback,
    }
}

fn build_tailoring_prompt(
    job_text: &str,
    keywords: &KeywordBundle,
    sections: &SectionMap,
    preserve_formatting: bool,
) -> String {
    // Both types serialize from plain strings and vectors.
    let keywords_json = serde_json::to_string_pretty(keywords).unwrap_or_default();
    let sections_json = serde_json::to_string_pretty(sections).unwrap_or_default();
    let formatting_instruction = if preserve_formatting {
        PRESERVE_FORMATTING_INSTRUCTION
    } else {
        ""
    };

    fill_template(
        TAILORING_PROMPT_TEMPLATE,
        &[
            ("job_description", job_text),
            ("keywords_json", keywords_json.as_str()),
            ("sections_json", sections_json.as_str()),
            ("formatting_instruction", formatting_instruction),
        ],
    )
}
