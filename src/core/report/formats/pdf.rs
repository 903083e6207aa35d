//! PDF report renderer via HTML-to-PDF conversion
//!
//! Writes the HTML rendering to a temporary file and prints it to PDF with
//! headless Chrome/Chromium. The HTML pages are sized to A4 so the printed
//! pages match the layout one to one.

use super::html::HtmlReporter;
use crate::core::error::{GradebookError, Result};
use crate::core::report::document::PagedDocument;
use crate::core::report::ReportGenerator;
use std::path::Path;
use std::process::{Command, Stdio};

/// PDF report renderer using HTML-to-PDF conversion
pub struct PdfReporter {
    /// Optional custom converter executable
    converter: Option<String>,
}

impl PdfReporter {
    /// Create a PDF reporter that auto-detects Chrome/Chromium
    #[must_use]
    pub const fn new() -> Self {
        Self { converter: None }
    }

    /// Create a PDF reporter with a custom converter
    #[must_use]
    pub fn with_converter(converter: &str) -> Self {
        Self {
            converter: Some(converter.to_owned()),
        }
    }

    /// Detect available Chrome/Chromium browser
    fn detect_chrome() -> Option<String> {
        let candidates = [
            "google-chrome",
            "chrome",
            "chromium",
            "chromium-browser",
            "google-chrome-stable",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
            "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
        ];

        candidates.into_iter().find_map(|candidate| {
            Command::new(candidate)
                .arg("--version")
                .output()
                .ok()
                .filter(|output| output.status.success())
                .map(|_| candidate.to_owned())
        })
    }

    /// Print an HTML file to PDF with Chrome/Chromium
    fn html_to_pdf_chrome(chrome_cmd: &str, html_path: &Path, pdf_path: &Path) -> Result<()> {
        let html_url = html_path
            .canonicalize()
            .map_err(|e| GradebookError::io(html_path, e))?;

        crate::debug!("Converting {} to PDF with {chrome_cmd}", html_url.display());
        let status = Command::new(chrome_cmd)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--run-all-compositor-stages-before-draw")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", html_url.display()))
            .stderr(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| GradebookError::Render(format!("could not run {chrome_cmd}: {e}")))?;

        if !status.success() {
            return Err(GradebookError::Render(format!(
                "Chrome PDF conversion failed ({status})"
            )));
        }

        Ok(())
    }

    /// Convert an HTML report to PDF
    fn convert_html_to_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<()> {
        if let Some(converter) = &self.converter {
            return Self::html_to_pdf_chrome(converter, html_path, pdf_path);
        }

        if let Some(chrome) = Self::detect_chrome() {
            return Self::html_to_pdf_chrome(&chrome, html_path, pdf_path);
        }

        Err(GradebookError::Render(
            "PDF conversion failed: Chrome/Chromium not found.\n\
            \n\
            To generate PDF reports, install Chrome or Chromium:\n\
            \n\
            • Ubuntu/Debian:  sudo apt install chromium-browser\n\
            • Fedora/RHEL:    sudo dnf install chromium\n\
            • macOS:          brew install --cask google-chrome\n\
            • Windows:        Download from https://www.google.com/chrome/\n\
            \n\
            Alternatively, point the config at a converter:\n\
              gradebook config set pdf_converter /path/to/chrome\n\
            "
            .to_string(),
        ))
    }
}

impl Default for PdfReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for PdfReporter {
    /// Render to a temporary HTML file, then print it to `output_path`
    fn generate(&self, doc: &PagedDocument, output_path: &Path) -> Result<()> {
        let html_path =
            std::env::temp_dir().join(format!("gradebook_report_{}.html", std::process::id()));

        HtmlReporter::new().generate(doc, &html_path)?;
        let converted = self.convert_html_to_pdf(&html_path, output_path);
        let _ = std::fs::remove_file(&html_path);

        converted
    }

    /// PDF output is binary; the text rendering is the intermediate HTML
    fn render(&self, doc: &PagedDocument) -> Result<String> {
        HtmlReporter::new().render(doc)
    }
}
