//! Renderer-independent report document.
//!
//! The layout is fixed so reports stay comparable across requests:
//! 1. Title block (contract title, influencer, URL)
//! 2. Five-row summary table (header + four checks)
//! 3. Missing keywords, only when the keyword check failed
//! 4. Numbered condition details
//!
//! Renderers consume a [`ReportDocument`] and never make layout decisions.

mod labels;
mod layout;

pub use labels::{ReportLabels, ReportLocale};
pub use layout::{Block, ReportDocument, ReportMetadata, SummaryTable};
