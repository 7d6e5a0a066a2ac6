//! PDF rendering with genpdf.
//!
//! The font is registered once, at startup, and cloned into every document.
//! It must cover Hangul: the built-in PDF fonts do not.

use std::path::Path;

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Alignment, Element as _};
use tracing::info;

use sponsorcheck_core::{Block, ReportDocument, SummaryTable};

use super::{DocumentRenderer, RenderError};

const BODY_FONT_SIZE: u8 = 11;
const LINE_HEIGHT_PT: f64 = 12.0;

/// Load a single TrueType file as a font family.
///
/// The same face serves all four styles; bold text is still bold in the
/// layout, but drawn with the regular glyphs.
pub fn load_font_family(path: &Path) -> Result<FontFamily<FontData>, RenderError> {
    let bytes = std::fs::read(path).map_err(|e| {
        RenderError::Font(format!("cannot read font {}: {}", path.display(), e))
    })?;
    let data = FontData::new(bytes, None).map_err(|e| RenderError::Font(e.to_string()))?;

    info!(font = %path.display(), "report font registered");
    Ok(FontFamily {
        regular: data.clone(),
        bold: data.clone(),
        italic: data.clone(),
        bold_italic: data,
    })
}

/// Renders report documents to A4 PDF files.
pub struct PdfRenderer {
    fonts: FontFamily<FontData>,
}

impl PdfRenderer {
    pub fn new(fonts: FontFamily<FontData>) -> Self {
        Self { fonts }
    }

    pub fn from_font_file(path: &Path) -> Result<Self, RenderError> {
        Ok(Self::new(load_font_family(path)?))
    }
}

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &ReportDocument, path: &Path) -> Result<(), RenderError> {
        let mut doc = genpdf::Document::new(self.fonts.clone());
        doc.set_title(document.title.clone());
        doc.set_paper_size(genpdf::PaperSize::A4);
        doc.set_font_size(BODY_FONT_SIZE);

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(20);
        doc.set_page_decorator(decorator);

        for block in &document.blocks {
            match block {
                Block::Title { label, value } => {
                    doc.push(
                        Paragraph::new(format!("{}: {}", label, value))
                            .styled(Style::new().bold().with_font_size(18)),
                    );
                }
                Block::Field { label, value } => {
                    doc.push(Paragraph::new(format!("{}: {}", label, value)));
                }
                Block::Table(table) => doc.push(summary_table(table)?),
                Block::Heading { level, text } => {
                    let size = if *level <= 2 { 15 } else { 13 };
                    doc.push(
                        Paragraph::new(text.as_str())
                            .styled(Style::new().bold().with_font_size(size)),
                    );
                }
                Block::Paragraph(text) => doc.push(Paragraph::new(text.as_str())),
                Block::Spacer(points) => doc.push(Break::new(f64::from(*points) / LINE_HEIGHT_PT)),
            }
        }

        doc.render_to_file(path)
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

fn summary_table(table: &SummaryTable) -> Result<TableLayout, RenderError> {
    let mut layout = TableLayout::new(vec![3, 2]);
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    for (index, row) in table.all_rows().enumerate() {
        let style = if index == 0 {
            Style::new().bold()
        } else {
            Style::new()
        };

        layout
            .row()
            .element(Paragraph::new(row[0].as_str()).styled(style))
            .element(
                Paragraph::new(row[1].as_str())
                    .aligned(Alignment::Center)
                    .styled(style),
            )
            .push()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
    }

    Ok(layout)
}
