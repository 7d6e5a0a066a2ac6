//! Plain-text rendering of a report document.

use std::path::Path;

use sponsorcheck_core::{Block, ReportDocument};

use super::{DocumentRenderer, RenderError};

/// Renders the document as UTF-8 text. Needs no fonts.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// The text that [`DocumentRenderer::render`] writes.
    pub fn to_text(&self, document: &ReportDocument) -> String {
        let mut lines: Vec<String> = Vec::new();

        for block in &document.blocks {
            match block {
                Block::Title { label, value } => {
                    lines.push(format!("{}: {}", label, value));
                    lines.push("=".repeat(40));
                }
                Block::Field { label, value } => lines.push(format!("{}: {}", label, value)),
                Block::Table(table) => {
                    let width = table
                        .all_rows()
                        .map(|row| row[0].chars().count())
                        .max()
                        .unwrap_or(0);
                    for row in table.all_rows() {
                        let pad = width - row[0].chars().count();
                        lines.push(format!("{}{} | {}", row[0], " ".repeat(pad), row[1]));
                    }
                }
                Block::Heading { level, text } => {
                    lines.push(format!("{} {}", "#".repeat(usize::from(*level)), text));
                }
                Block::Paragraph(text) => lines.push(text.clone()),
                Block::Spacer(_) => {
                    if lines.last().is_some_and(|l| !l.is_empty()) {
                        lines.push(String::new());
                    }
                }
            }
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &ReportDocument, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, self.to_text(document))?;
        Ok(())
    }
}
