//! Rendering Adapter: section map → presentation data → HTML → PDF.
//!
//! `to_render_data` is the heuristic step; `template` and `pdf` hand the
//! result to tera and an external HTML-to-PDF engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tailoring::sections::SectionMap;

pub mod pdf;
pub mod template;

pub const DEFAULT_NAME: &str = "Your Name";

/// Words that mark a contact line as a street address.
const LOCATION_MARKERS: &[&str] = &["street", "avenue", "road", "drive", "lane"];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("I/O error while rendering PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF engine '{engine}' failed: {stderr}")]
    Engine { engine: String, stderr: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub degree: String,
    pub school: String,
}

/// Data handed to the resume template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRenderData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub experience_items: Vec<ExperienceItem>,
    pub education_items: Vec<EducationItem>,
    pub skills: Vec<String>,
    pub projects: String,
    pub certifications: String,
}

/// Derives template data from tailored sections.
///
/// The first contact line is the name. Each later contact line is classified
/// as email (`@`), else phone (any digit), else location (street-type word);
/// a later line of the same kind replaces an earlier one.
pub fn to_render_data(sections: &SectionMap) -> ResumeRenderData {
    let mut contact_lines = sections
        .contact
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let name = contact_lines
        .next()
        .map(String::from)
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    let mut email = String::new();
    let mut phone = String::new();
    let mut location = String::new();

    for line in contact_lines {
        let lower = line.to_lowercase();
        if line.contains('@') {
            email = line.to_string();
        } else if line.chars().any(|c| c.is_ascii_digit()) {
            phone = line.to_string();
        } else if LOCATION_MARKERS.iter().any(|w| lower.contains(w)) {
            location = line.to_string();
        }
    }

    let experience = sections.experience.trim();
    let experience_items = if experience.is_empty() {
        Vec::new()
    } else {
        vec![ExperienceItem {
            title: "Experience".to_string(),
            content: experience.to_string(),
        }]
    };

    let education = sections.education.trim();
    let education_items = if education.is_empty() {
        Vec::new()
    } else {
        vec![EducationItem {
            degree: "Education".to_string(),
            school: education.to_string(),
        }]
    };

    let skills = sections
        .skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    ResumeRenderData {
        name,
        email,
        phone,
        location,
        summary: sections.summary.trim().to_string(),
        experience_items,
        education_items,
        skills,
        projects: sections.projects.trim().to_string(),
        certifications: sections.certifications.trim().to_string(),
    }
}
