// ABOUTME: Error types for the udl-export library
// ABOUTME: Provides structured error handling for parsing input and writing documents

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write file: {0}")]
    FileWriteError(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Unknown version key: {0} (expected one of: simplified, on_level, enriched, visual_heavy, scaffolded)")]
    UnknownVersionKey(String),

    #[error("Malformed assignment record: {0}")]
    RecordError(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::ArchiveError(format!("ZIP operation failed: {}", err))
    }
}

// Implement conversion from serde_json errors for assignment records
impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::RecordError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
