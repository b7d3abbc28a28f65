// ABOUTME: Configuration module for the udl-export tool
// ABOUTME: Provides configuration settings and environment variable handling

use crate::export::ExportOptions;
use std::env;
use std::path::PathBuf;

/// Global configuration for the tool
pub struct Config {
    pub artifact_prefix: String,
    pub credit_line: String,
    pub default_output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = ExportOptions::default();
        Self {
            artifact_prefix: defaults.artifact_prefix,
            credit_line: defaults.credit_line,
            default_output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            artifact_prefix: env::var("UDL_EXPORT_PREFIX").unwrap_or(defaults.artifact_prefix),
            credit_line: env::var("UDL_EXPORT_CREDIT").unwrap_or(defaults.credit_line),
            default_output_dir: env::var("UDL_EXPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.default_output_dir),
        }
    }

    /// Get export options with defaults from this config
    pub fn get_export_options(&self, prefix: Option<String>) -> ExportOptions {
        ExportOptions {
            artifact_prefix: prefix.unwrap_or_else(|| self.artifact_prefix.clone()),
            credit_line: self.credit_line.clone(),
        }
    }
}
