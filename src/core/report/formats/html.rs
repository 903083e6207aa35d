//! HTML report renderer
//!
//! Produces a self-contained page-per-`<section>` document. Blocks are
//! absolutely positioned at the offsets computed during layout and the chart
//! is inlined as a base64 `data:` URI.

use crate::core::error::{GradebookError, Result};
use crate::core::report::document::{Block, HeadingLevel, Page, PagedDocument, TableRow};
use crate::core::report::ReportGenerator;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("../templates/report.html");

/// HTML report renderer
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the document using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, doc: &PagedDocument) -> String {
        let mut pages = String::new();
        for page in doc.pages() {
            Self::render_page(&mut pages, page);
        }

        HTML_TEMPLATE
            .replace("{{title}}", &escape(doc.title()))
            .replace("{{pages}}", &pages)
    }

    fn render_page(out: &mut String, page: &Page) {
        let _ = writeln!(out, "<section class=\"page\">");
        for block in &page.blocks {
            Self::render_block(out, block);
        }
        if let Some(footer) = &page.footer {
            let _ = writeln!(out, "  <footer>{}</footer>", escape(footer));
        }
        let _ = writeln!(out, "</section>");
    }

    fn render_block(out: &mut String, block: &Block) {
        match block {
            Block::Heading { text, level, y } => {
                let tag = match level {
                    HeadingLevel::Title => "h1",
                    HeadingLevel::Section => "h2",
                };
                let _ = writeln!(
                    out,
                    "  <{tag} class=\"block\" style=\"top: {y:.1}mm\">{}</{tag}>",
                    escape(text)
                );
            }
            Block::Text { text, y } => {
                let _ = writeln!(
                    out,
                    "  <p class=\"block\" style=\"top: {y:.1}mm\">{}</p>",
                    escape(text)
                );
            }
            Block::Table {
                header,
                rows,
                header_height,
                row_heights,
                y,
                ..
            } => {
                let _ = writeln!(out, "  <table class=\"block\" style=\"top: {y:.1}mm\">");
                let _ = write!(out, "    <thead><tr style=\"height: {header_height:.1}mm\">");
                for cell in header {
                    let _ = write!(out, "<th>{}</th>", header_cell(cell));
                }
                let _ = writeln!(out, "</tr></thead>");
                let _ = writeln!(out, "    <tbody>");
                for (row, height) in rows.iter().zip(row_heights) {
                    Self::render_row(out, row, *height);
                }
                let _ = writeln!(out, "    </tbody>");
                let _ = writeln!(out, "  </table>");
            }
            Block::Image {
                png,
                width,
                height,
                y,
            } => {
                let _ = writeln!(
                    out,
                    "  <img class=\"block\" style=\"top: {y:.1}mm; width: {width:.1}mm; height: {height:.1}mm\" alt=\"Grade distribution chart\" src=\"data:image/png;base64,{}\">",
                    STANDARD.encode(png)
                );
            }
        }
    }

    fn render_row(out: &mut String, row: &TableRow, height: f64) {
        let class = if row.emphasis { " class=\"emphasis\"" } else { "" };
        let _ = write!(out, "      <tr{class} style=\"height: {height:.1}mm\">");
        for cell in &row.cells {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        let _ = writeln!(out, "</tr>");
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Header cell with an optional `\n`-separated subheading
fn header_cell(cell: &str) -> String {
    match cell.split_once('\n') {
        Some((title, sub)) => format!("{}<br><small>{}</small>", escape(title), escape(sub)),
        None => escape(cell),
    }
}

/// Escape text for HTML element and attribute content
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, doc: &PagedDocument, output_path: &Path) -> Result<()> {
        let report_content = self.render(doc)?;
        fs::write(output_path, report_content).map_err(|e| GradebookError::io(output_path, e))
    }

    fn render(&self, doc: &PagedDocument) -> Result<String> {
        Ok(self.render_template(doc))
    }
}
