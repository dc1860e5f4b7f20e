use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::ids::DocumentId;
use chrono::{DateTime, Utc};

/// Category a document is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DocumentCategory {
    Patent,
    Diagram,
    Investor,
    Technical,
    Other,
}

impl DocumentCategory {
    pub const ALL: [Self; 5] = [
        Self::Patent,
        Self::Diagram,
        Self::Investor,
        Self::Technical,
        Self::Other,
    ];

    /// Wire value used by the backend and the `?category=` filter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patent => "patent",
            Self::Diagram => "diagram",
            Self::Investor => "investor",
            Self::Technical => "technical",
            Self::Other => "other",
        }
    }

    /// Human readable label shown in the admin panel
    pub fn label(&self) -> &'static str {
        match self {
            Self::Patent => "Patent",
            Self::Diagram => "Diagram",
            Self::Investor => "Investor Deck",
            Self::Technical => "Technical Documentation",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "document category",
                value: s.to_string(),
            })
    }
}

/// Stored document metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub id: DocumentId,
    pub file_name: String,
    /// Storage reference as returned by the backend
    #[cfg_attr(feature = "serde", serde(default))]
    pub file: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_url: Option<String>,
    pub category: DocumentCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Best link to the stored file, preferring the absolute url
    pub fn link(&self) -> Option<&str> {
        self.file_url.as_deref().or(self.file.as_deref())
    }
}

/// Metadata-only document creation payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentDraft {
    pub file_name: String,
    pub category: DocumentCategory,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
    /// Storage reference. Defaults to the static documents path for the file
    /// name when not set.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub file: Option<String>,
}

impl DocumentDraft {
    pub fn new(file_name: impl Into<String>, category: DocumentCategory) -> Self {
        let file_name = file_name.into();
        Self {
            file: Some(format!("/static/documents/{file_name}")),
            file_name,
            category,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Document metadata replacement payload (`PUT`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentUpdate {
    pub file_name: String,
    pub category: DocumentCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

impl From<&Document> for DocumentUpdate {
    fn from(value: &Document) -> Self {
        Self {
            file_name: value.file_name.clone(),
            category: value.category,
            description: value.description.clone(),
        }
    }
}
