// ABOUTME: Library module for the udl-export program.
// ABOUTME: Contains core functionality for parsing lesson content and exporting documents.

// Reexport modules
pub mod config;
pub mod docx;
pub mod errors;
pub mod export;
pub mod markup;
pub mod pdf;
pub mod pptx;
pub mod sections;
pub mod utils;
pub mod version;
pub mod xlsx;

// Reexport common types and functions
pub use config::Config;
pub use docx::export_docx;
pub use errors::{ExportError, Result};
pub use export::{ExportOptions, export_filename};
pub use markup::{Segment, convert_checkboxes, parse_segments, strip_markup};
pub use pdf::export_pdf;
pub use pptx::export_pptx;
pub use sections::{ClassifiedLine, LineKind, Section, classify_line, split_sections};
pub use version::{AssignmentRecord, FormData, Materials, VersionContent, VersionKey};
pub use xlsx::export_all_xlsx;

#[cfg(test)]
mod tests;
