// LLM prompt templates for keyword extraction and resume tailoring.

/// Keyword extraction prompt. Fill `{job_description}` before sending.
pub const KEYWORD_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract:
1. Key technical skills and technologies
2. Required qualifications and experience
3. Preferred qualifications
4. Job responsibilities
5. Industry-specific keywords

Job Description:
{job_description}

Return the analysis as a JSON object with the following structure:
{
  "technical_skills": ["skill1", "skill2"],
  "required_qualifications": ["qual1", "qual2"],
  "preferred_qualifications": ["pref1", "pref2"],
  "responsibilities": ["resp1", "resp2"],
  "industry_keywords": ["keyword1", "keyword2"],
  "experience_level": "entry/mid/senior",
  "job_category": "software_engineering/marketing/sales/etc"
}"#;

/// Tailoring prompt.
/// Fill: {job_description}, {keywords_json}, {sections_json}, {formatting_instruction}
pub const TAILORING_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Tailor the following resume for the job description provided.

Job Description:
{job_description}

Extracted Keywords and Requirements:
{keywords_json}

Current Resume Sections:
{sections_json}

Instructions:
1. Rewrite each section to better match the job requirements
2. Use keywords from the job description naturally
3. Emphasize relevant experience and skills
4. Remove or minimize irrelevant content
5. Ensure the resume fits on one page (approximately 500-600 words total)
6. Maintain professional tone and formatting
7. Focus on achievements and quantifiable results
{formatting_instruction}

Return the tailored resume as a JSON object with the following structure:
{
  "contact": "contact information",
  "summary": "tailored professional summary",
  "experience": "tailored work experience",
  "education": "education section",
  "skills": "tailored skills section",
  "projects": "relevant projects (if any)",
  "certifications": "relevant certifications (if any)",
  "word_count": 500,
  "estimated_pages": 1.0
}"#;

/// Appended when the caller asks to keep the original layout.
pub const PRESERVE_FORMATTING_INSTRUCTION: &str = "8. Preserve the original line structure, \
    ordering and bullet style of each section; change wording, not layout";

/// Substitutes `{name}` placeholders in one pass over `template`.
///
/// Only placeholders written in the template are expanded; braces inside the
/// substituted values are copied through untouched. Unknown `{...}` spans are
/// left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
