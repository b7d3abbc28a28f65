// ABOUTME: Version-key and assignment-record types for the udl-export library
// ABOUTME: Defines the five differentiation versions and the JSON shapes they travel in

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder text used when a version has neither content nor an error.
pub const NO_CONTENT_PLACEHOLDER: &str = "No content generated";

/// The five fixed differentiation versions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VersionKey {
    Simplified,
    OnLevel,
    Enriched,
    VisualHeavy,
    Scaffolded,
}

impl VersionKey {
    /// All version keys, in canonical order.
    pub const ALL: [VersionKey; 5] = [
        VersionKey::Simplified,
        VersionKey::OnLevel,
        VersionKey::Enriched,
        VersionKey::VisualHeavy,
        VersionKey::Scaffolded,
    ];

    /// Wire name used in JSON records, filenames, and sheet names.
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionKey::Simplified => "simplified",
            VersionKey::OnLevel => "on_level",
            VersionKey::Enriched => "enriched",
            VersionKey::VisualHeavy => "visual_heavy",
            VersionKey::Scaffolded => "scaffolded",
        }
    }

    /// Human-readable display name used in document titles and sheet headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            VersionKey::Simplified => "Simplified (Below Grade Level)",
            VersionKey::OnLevel => "On-Level (Grade Appropriate)",
            VersionKey::Enriched => "Enriched (Above Grade Level)",
            VersionKey::VisualHeavy => "Visual-Heavy",
            VersionKey::Scaffolded => "Step-by-Step Scaffolded",
        }
    }

    /// Parse a wire name back into a version key.
    pub fn parse(s: &str) -> Option<VersionKey> {
        VersionKey::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated differentiation version, carried verbatim from the
/// generation layer. Immutable once created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionContent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl VersionContent {
    /// Resolve the text a renderer should consume: the generated content,
    /// an error line, or the empty-content placeholder.
    pub fn resolved_content(&self) -> String {
        if let Some(err) = &self.error {
            format!("Error: {}", err)
        } else if self.content.trim().is_empty() {
            NO_CONTENT_PLACEHOLDER.to_string()
        } else {
            self.content.clone()
        }
    }
}

/// Generated materials keyed by version.
pub type Materials = BTreeMap<VersionKey, VersionContent>;

/// Resolve the content string for one version, substituting the placeholder
/// when the version is missing entirely.
pub fn resolve_content(materials: &Materials, key: VersionKey) -> String {
    materials
        .get(&key)
        .map(VersionContent::resolved_content)
        .unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string())
}

/// Wizard form fields consumed by the renderers. Read-only here; any extra
/// fields the wizard collects pass through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub learning_objective: String,
    #[serde(default)]
    pub grade_level: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FormData {
    pub fn objective(&self) -> &str {
        if self.learning_objective.trim().is_empty() {
            "N/A"
        } else {
            &self.learning_objective
        }
    }

    pub fn grade(&self) -> &str {
        if self.grade_level.trim().is_empty() {
            "N/A"
        } else {
            &self.grade_level
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// One saved assignment: the form inputs plus the generated materials.
/// This is the record shape the wizard persists and the CLI reads back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub form_data: FormData,
    #[serde(default)]
    pub materials: Materials,
}
