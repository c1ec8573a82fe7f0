//! Section Segmenter: splits raw resume text into the seven named sections.
//!
//! This is a keyword-in-line heuristic, not a parser. A line switches the
//! current section when it contains one of that section's keywords; every
//! line is appended to whatever section is current at the time.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One of the seven fixed regions of resume content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl Section {
    /// Detection priority and output order.
    pub const ALL: [Section; 7] = [
        Section::Contact,
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Certifications,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Contact => "contact",
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
        }
    }

    /// Lower-case substrings that mark a line as this section's header.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Section::Contact => &["contact", "personal", "info"],
            Section::Summary => &["summary", "objective", "profile"],
            Section::Experience => &["experience", "work", "employment"],
            Section::Education => &["education", "academic", "degree"],
            Section::Skills => &["skills", "technologies", "tools"],
            Section::Projects => &["projects", "portfolio"],
            Section::Certifications => &["certifications", "certificates"],
        }
    }

    /// First section (in `ALL` order) with a keyword in `lower_line`.
    fn detect(lower_line: &str) -> Option<Section> {
        Section::ALL
            .into_iter()
            .find(|section| section.keywords().iter().any(|kw| lower_line.contains(kw)))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text for each of the seven sections. Always serializes with all seven keys.
///
/// Deserialization is lenient because the same shape comes back from the
/// model: missing keys and `null` become empty strings, arrays are joined
/// line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionMap {
    #[serde(deserialize_with = "lenient_text")]
    pub contact: String,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: String,
    #[serde(deserialize_with = "lenient_text")]
    pub experience: String,
    #[serde(deserialize_with = "lenient_text")]
    pub education: String,
    #[serde(deserialize_with = "lenient_text")]
    pub skills: String,
    #[serde(deserialize_with = "lenient_text")]
    pub projects: String,
    #[serde(deserialize_with = "lenient_text")]
    pub certifications: String,
}

impl SectionMap {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Contact => &self.contact,
            Section::Summary => &self.summary,
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Skills => &self.skills,
            Section::Projects => &self.projects,
            Section::Certifications => &self.certifications,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Contact => &mut self.contact,
            Section::Summary => &mut self.summary,
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
            Section::Skills => &mut self.skills,
            Section::Projects => &mut self.projects,
            Section::Certifications => &mut self.certifications,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> + '_ {
        Section::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Joins the non-empty sections in fixed order with blank lines between.
    pub fn compose(&self) -> String {
        self.iter()
            .map(|(_, text)| text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn word_count(&self) -> usize {
        self.iter().map(|(_, text)| text.split_whitespace().count()).sum()
    }
}

/// Splits `text` into sections.
///
/// Lines are trimmed and blank lines skipped. Lines seen before the first
/// recognised header are dropped. Ties between sections resolve in
/// `Section::ALL` order.
pub fn segment(text: &str) -> SectionMap {
    let mut sections = SectionMap::default();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(detected) = Section::detect(&line.to_lowercase()) {
            current = Some(detected);
        }

        if let Some(section) = current {
            let buf = sections.get_mut(section);
            buf.push_str(line);
            buf.push('\n');
        }
    }

    for section in Section::ALL {
        let buf = sections.get_mut(section);
        let trimmed_len = buf.trim_end().len();
        buf.truncate(trimmed_len);
    }

    sections
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "\
Jane Smith
Contact Information
jane@example.com
(555) 123-4567

Professional Summary
Backend engineer with 6 years building APIs.

Work Experience
Acme Corp, Senior Engineer, 2020-2024
Built billing pipeline in Python.

Education
B.S. Computer Science, State University

Skills
Python, SQL, Docker

Projects
Open-source CLI for log parsing

Certifications
AWS Solutions Architect";

    #[test]
    fn test_contact_and_skills_example() {
        let sections = segment("Contact\nJohn Doe\njohn@x.com\nSkills\nPython, SQL");
        assert!(sections.contact.contains("John Doe"));
        assert!(sections.contact.contains("john@x.com"));
        assert!(sections.skills.contains("Python, SQL"));
        assert!(sections.summary.is_empty());
    }

    #[test]
    fn test_full_resume_segments_every_section() {
        let sections = segment(SAMPLE_RESUME);
        assert!(sections.contact.starts_with("Contact Information"));
        assert!(sections.contact.contains("(555) 123-4567"));
        assert!(sections.summary.contains("Backend engineer"));
        assert!(sections.experience.contains("Acme Corp"));
        assert!(sections.education.contains("State University"));
        assert_eq!(sections.skills, "Skills\nPython, SQL, Docker");
        assert!(sections.projects.contains("log parsing"));
        assert!(sections.certifications.contains("AWS Solutions Architect"));
    }

    #[test]
    fn test_lines_before_first_header_are_dropped() {
        let sections = segment(SAMPLE_RESUME);
        assert!(!sections.compose().contains("Jane Smith"));
    }

    #[test]
    fn test_empty_text_yields_empty_sections() {
        let sections = segment("");
        assert_eq!(sections, SectionMap::default());
        assert_eq!(sections.compose(), "");
    }

    #[test]
    fn test_no_headers_yields_empty_sections() {
        let sections = segment("Jane Smith\nBuilt things\nShipped stuff");
        assert_eq!(sections, SectionMap::default());
    }

    #[test]
    fn test_tie_resolves_to_higher_priority_section() {
        // "profile" (summary) and "skills" both match; summary wins.
        let sections = segment("Profile and Skills\nRust, Go");
        assert_eq!(sections.summary, "Profile and Skills\nRust, Go");
        assert!(sections.skills.is_empty());
    }

    #[test]
    fn test_content_line_containing_keyword_switches_section() {
        // Heuristic: "work" inside a skills line moves the pointer.
        let sections = segment("Skills\nRust\nTeamwork and communication");
        assert_eq!(sections.skills, "Skills\nRust");
        assert_eq!(sections.experience, "Teamwork and communication");
    }

    #[test]
    fn test_segment_is_idempotent() {
        assert_eq!(segment(SAMPLE_RESUME), segment(SAMPLE_RESUME));
    }

    #[test]
    fn test_serializes_exactly_seven_keys() {
        for input in ["", "random text", SAMPLE_RESUME] {
            let value = serde_json::to_value(segment(input)).unwrap();
            let obj = value.as_object().unwrap();
            assert_eq!(obj.len(), 7);
            for section in Section::ALL {
                assert!(obj[section.as_str()].is_string());
            }
        }
    }

    #[test]
    fn test_compose_skips_empty_sections() {
        let sections = SectionMap {
            contact: "Jane".to_string(),
            experience: "Acme".to_string(),
            skills: "  ".to_string(),
            certifications: "AWS".to_string(),
            ..Default::default()
        };
        assert_eq!(sections.compose(), "Jane\n\nAcme\n\nAWS");
    }

    #[test]
    fn test_lenient_deserialization() {
        let json = r#"{
            "contact": "Jane",
            "summary": null,
            "skills": ["Rust", "SQL"],
            "word_count": 500
        }"#;
        let sections: SectionMap = serde_json::from_str(json).unwrap();
        assert_eq!(sections.contact, "Jane");
        assert!(sections.summary.is_empty());
        assert_eq!(sections.skills, "Rust\nSQL");
        assert!(sections.projects.is_empty());
    }

    #[test]
    fn test_word_count_sums_sections() {
        let sections = segment("Contact\nJohn Doe\nSkills\nPython, SQL");
        assert_eq!(sections.word_count(), 6);
    }
}
