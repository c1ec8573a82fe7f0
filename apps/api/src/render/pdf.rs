//! HTML → PDF through an external engine binary.
//!
//! `AppState` holds an `Arc<dyn PdfRenderer>`; the engine is picked at
//! startup from `PDF_ENGINE`.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::render::RenderError;

/// Supported HTML-to-PDF command-line engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfEngine {
    Wkhtmltopdf,
    Weasyprint,
}

impl PdfEngine {
    pub fn program(self) -> &'static str {
        match self {
            PdfEngine::Wkhtmltopdf => "wkhtmltopdf",
            PdfEngine::Weasyprint => "weasyprint",
        }
    }

    /// Command-line arguments converting `input` into `output`.
    pub fn args(self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let output = output.display().to_string();
        match self {
            // wkhtmltopdf ignores @page margins, so pass them explicitly.
            PdfEngine::Wkhtmltopdf => vec![
                "--quiet".to_string(),
                "--encoding".to_string(),
                "utf-8".to_string(),
                "--page-size".to_string(),
                "A4".to_string(),
                "--margin-top".to_string(),
                "19mm".to_string(),
                "--margin-bottom".to_string(),
                "19mm".to_string(),
                "--margin-left".to_string(),
                "19mm".to_string(),
                "--margin-right".to_string(),
                "19mm".to_string(),
                input,
                output,
            ],
            PdfEngine::Weasyprint => vec![input, output],
        }
    }
}

impl FromStr for PdfEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wkhtmltopdf" => Ok(PdfEngine::Wkhtmltopdf),
            "weasyprint" => Ok(PdfEngine::Weasyprint),
            other => Err(format!("unknown PDF engine '{other}'")),
        }
    }
}

/// Converts a rendered HTML document into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Runs the configured engine against files in a scratch directory.
pub struct CommandPdfRenderer {
    engine: PdfEngine,
}

impl CommandPdfRenderer {
    pub fn new(engine: PdfEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("resume.html");
        let output = workdir.path().join("resume.pdf");

        tokio::fs::write(&input, html).await?;

        debug!("Running {} in {}", self.engine.program(), workdir.path().display());
        let result = Command::new(self.engine.program())
            .args(self.engine.args(&input, &output))
            .output()
            .await?;

        if !result.status.success() {
            return Err(RenderError::Engine {
                engine: self.engine.program().to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let pdf = tokio::fs::read(&output).await?;
        info!("{} produced {} bytes", self.engine.program(), pdf.len());
        Ok(pdf)
    }
}
