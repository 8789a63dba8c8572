//! Image label metadata.

use serde::{Deserialize, Serialize};

/// OCI annotation key for image authors.
pub const AUTHORS_LABEL: &str = "org.opencontainers.image.authors";

/// Structured label metadata attached to the built image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLabels {
    /// Image authors
    #[serde(rename = "org.opencontainers.image.authors")]
    pub authors: Vec<String>,

    /// Image version
    pub version: Option<String>,

    /// Human-readable description
    pub description: Option<String>,
}

impl ImageLabels {
    /// Populated labels as `(key, value)` pairs in emission order.
    ///
    /// Authors are joined with `", "` and omitted when the list is empty.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if !self.authors.is_empty() {
            entries.push((AUTHORS_LABEL.to_string(), self.authors.join(", ")));
        }
        if let Some(ref version) = self.version {
            entries.push(("version".to_string(), version.clone()));
        }
        if let Some(ref description) = self.description {
            entries.push(("description".to_string(), description.clone()));
        }
        entries
    }
}
