use tera::{Context, Tera};

use crate::render::{RenderError, ResumeRenderData};

/// Single-column A4 layout. Multi-line blocks rely on `white-space: pre-line`
/// so the template never has to emit raw markup from user text.
pub const PROFESSIONAL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ name }} - Resume</title>
<style>
@page { size: A4; margin: 0.75in; }
body { font-family: 'Arial', 'Helvetica', sans-serif; font-size: 11pt; line-height: 1.4; color: #333; margin: 0; padding: 0; }
.header { text-align: center; margin-bottom: 20px; border-bottom: 2px solid #2c3e50; padding-bottom: 10px; }
.name { font-size: 24pt; font-weight: bold; color: #2c3e50; margin-bottom: 5px; }
.contact-info { font-size: 10pt; color: #666; margin-bottom: 5px; }
.section { margin-bottom: 15px; }
.section-title { font-size: 14pt; font-weight: bold; color: #2c3e50; border-bottom: 1px solid #bdc3c7; margin-bottom: 8px; text-transform: uppercase; letter-spacing: 1px; }
.block { white-space: pre-line; }
.summary { font-style: italic; color: #555; }
.item-title { font-weight: bold; color: #2c3e50; }
.skills-list { display: flex; flex-wrap: wrap; gap: 10px; }
.skill-item { background-color: #ecf0f1; padding: 3px 8px; border-radius: 3px; font-size: 10pt; }
</style>
</head>
<body>
<div class="resume-container">
  <div class="header">
    <div class="name">{{ name }}</div>
    <div class="contact-info">{{ contact_line }}</div>
  </div>
{% if summary %}
  <div class="section">
    <div class="section-title">Professional Summary</div>
    <div class="block summary">{{ summary }}</div>
  </div>
{% endif %}
{% if experience_items %}
  <div class="section">
    <div class="section-title">Experience</div>
    {% for item in experience_items %}
    <div class="block">{{ item.content }}</div>
    {% endfor %}
  </div>
{% endif %}
{% if education_items %}
  <div class="section">
    <div class="section-title">Education</div>
    {% for item in education_items %}
    <div class="block">{{ item.school }}</div>
    {% endfor %}
  </div>
{% endif %}
{% if skills %}
  <div class="section">
    <div class="section-title">Skills</div>
    <div class="skills-list">
      {% for skill in skills %}<span class="skill-item">{{ skill }}</span>{% endfor %}
    </div>
  </div>
{% endif %}
{% if projects %}
  <div class="section">
    <div class="section-title">Projects</div>
    <div class="block">{{ projects }}</div>
  </div>
{% endif %}
{% if certifications %}
  <div class="section">
    <div class="section-title">Certifications</div>
    <div class="block">{{ certifications }}</div>
  </div>
{% endif %}
</div>
</body>
</html>
"#;

/// Renders the professional resume template with autoescaping enabled.
pub fn render_html(data: &ResumeRenderData) -> Result<String, RenderError> {
    let mut context = Context::from_serialize(data)?;
    context.insert("contact_line", &contact_line(data));
    Ok(Tera::one_off(PROFESSIONAL_TEMPLATE, &context, true)?)
}

/// Email, phone and location joined by " | ", skipping empty parts.
fn contact_line(data: &ResumeRenderData) -> String {
    [&data.email, &data.phone, &data.location]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{to_render_data, ExperienceItem};
    use crate::tailoring::sections::SectionMap;

    fn sample() -> ResumeRenderData {
        ResumeRenderData {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0100".to_string(),
            location: String::new(),
            summary: "Backend engineer".to_string(),
            experience_items: vec![ExperienceItem {
                title: "Experience".to_string(),
                content: "Acme Corp\nBuilt billing".to_string(),
            }],
            education_items: vec![],
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            projects: String::new(),
            certifications: String::new(),
        }
    }

    #[test]
    fn test_renders_populated_sections() {
        let html = render_html(&sample()).unwrap();
        assert!(html.contains("<div class=\"name\">Jane Doe</div>"));
        assert!(html.contains("jane@example.com | 555-0100"));
        assert!(html.contains("Acme Corp\nBuilt billing"));
        assert!(html.contains("<span class=\"skill-item\">Rust</span>"));
        assert!(html.contains("Professional Summary"));
    }

    #[test]
    fn test_omits_empty_sections() {
        let html = render_html(&sample()).unwrap();
        assert!(!html.contains(">Education<"));
        assert!(!html.contains(">Projects<"));
        assert!(!html.contains(">Certifications<"));
    }

    #[test]
    fn test_escapes_user_text() {
        let mut data = sample();
        data.summary = "<script>alert(1)</script> & more".to_string();
        let html = render_html(&data).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_renders_default_data() {
        let html = render_html(&to_render_data(&SectionMap::default())).unwrap();
        assert!(html.contains("Your Name"));
        assert!(!html.contains("skill-item\">"));
    }
}
