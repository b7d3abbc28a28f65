// ABOUTME: Utility functions for the udl-export library
// ABOUTME: Provides filename sanitization and output-directory validation helpers

use crate::errors::{ExportError, Result};
use crate::version::FormData;
use log::warn;
use std::path::Path;

/// Strip characters that are invalid in filenames on common platforms and
/// cap the result at 50 characters.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .take(50)
        .collect()
}

/// Short filename stub derived from the learning objective: the first 30
/// characters, sanitized. Falls back to "materials" when no objective is set.
pub fn objective_stub(form: &FormData) -> String {
    let objective = if form.learning_objective.trim().is_empty() {
        "materials"
    } else {
        &form.learning_objective
    };
    let head: String = objective.chars().take(30).collect();
    sanitize_filename(&head)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(ExportError::FileWriteError)?;
    } else if !path.is_dir() {
        return Err(ExportError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Validate write permissions for a directory
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    // First ensure it exists
    ensure_directory_exists(path)?;

    // Try to create a temporary file to test write permissions
    let test_file = path.join(format!("test_write_{}.tmp", uuid::Uuid::new_v4()));
    match std::fs::File::create(&test_file) {
        Ok(_) => {
            // Clean up the test file
            if let Err(e) = std::fs::remove_file(&test_file) {
                warn!("Failed to clean up test file {:?}: {}", test_file, e);
            }
            Ok(())
        }
        Err(e) => Err(ExportError::ValidationError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}
