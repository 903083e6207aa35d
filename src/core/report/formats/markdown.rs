//! Markdown report renderer
//!
//! Pages are separated by horizontal rules and end with their footer line.
//! Tables become pipe tables; the chart is an inline data URI image, which
//! renders in VS Code and most Markdown previewers.

use crate::core::error::{GradebookError, Result};
use crate::core::report::document::{Block, HeadingLevel, PagedDocument};
use crate::core::report::ReportGenerator;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Markdown report renderer
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[allow(clippy::unused_self)]
    fn render_document(&self, doc: &PagedDocument) -> String {
        let mut out = String::new();

        for (i, page) in doc.pages().iter().enumerate() {
            if i > 0 {
                let _ = writeln!(out, "\n---\n");
            }
            for block in &page.blocks {
                Self::render_block(&mut out, block);
            }
            if let Some(footer) = &page.footer {
                let _ = writeln!(out, "<p align=\"center\"><sub>{footer}</sub></p>");
            }
        }

        out
    }

    fn render_block(out: &mut String, block: &Block) {
        match block {
            Block::Heading { text, level, .. } => {
                let marker = match level {
                    HeadingLevel::Title => "#",
                    HeadingLevel::Section => "##",
                };
                let _ = writeln!(out, "{marker} {text}\n");
            }
            Block::Text { text, .. } => {
                let _ = writeln!(out, "{text}  ");
            }
            Block::Table { header, rows, .. } => {
                let _ = writeln!(out);
                let cells: Vec<String> = header.iter().map(|c| table_cell(c)).collect();
                let _ = writeln!(out, "| {} |", cells.join(" | "));
                let _ = writeln!(out, "|{}", "---|".repeat(header.len()));
                for row in rows {
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|c| {
                            let cell = table_cell(c);
                            if row.emphasis && !cell.is_empty() {
                                format!("**{cell}**")
                            } else {
                                cell
                            }
                        })
                        .collect();
                    let _ = writeln!(out, "| {} |", cells.join(" | "));
                }
                let _ = writeln!(out);
            }
            Block::Image { png, .. } => {
                let _ = writeln!(
                    out,
                    "![Grade distribution chart](data:image/png;base64,{})\n",
                    STANDARD.encode(png)
                );
            }
        }
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipe-table cell: pipes escaped, subheadings on a second line
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, doc: &PagedDocument, output_path: &Path) -> Result<()> {
        let report_content = self.render(doc)?;
        fs::write(output_path, report_content).map_err(|e| GradebookError::io(output_path, e))
    }

    fn render(&self, doc: &PagedDocument) -> Result<String> {
        Ok(self.render_document(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::document::{DocumentBuilder, Table};

    #[test]
    fn test_table_cell_escaping() {
        assert_eq!(table_cell("a|b"), "a\\|b");
        assert_eq!(table_cell("Quiz 1\n( / 10 )"), "Quiz 1<br>( / 10 )");
    }

    #[test]
    fn test_render_table_and_page_rule() {
        let mut doc = PagedDocument::new("Report");
        doc.add_heading("Detailed Grades", HeadingLevel::Section);
        let mut table = Table::new(["Student Name", "Quiz 1\n( / 10 )"]);
        table.push_row(vec!["Ada".to_string(), "8".to_string()]);
        table.push_emphasized_row(vec!["Highest Score".to_string(), "8".to_string()]);
        doc.add_table(table);
        doc.new_page();
        doc.add_text("next");
        doc.finalize("Generated from Gradebook System");

        let md = MarkdownReporter::new().render(&doc).unwrap();
        assert!(md.contains("## Detailed Grades"));
        assert!(md.contains("| Student Name | Quiz 1<br>( / 10 ) |\n|---|---|\n| Ada | 8 |\n| **Highest Score** | **8** |"));
        assert_eq!(md.matches("\n---\n").count(), 1);
        assert!(md.contains("Page 1 of 2 | Generated from Gradebook System"));
    }
}
