use crate::ids::ContentBlockId;
use chrono::{DateTime, Utc};

/// Page identifier used when a block does not name one
pub const DEFAULT_PAGE: &str = "home";

/// Pages the admin panel offers for content blocks. The backend accepts any
/// string, so this list is advisory.
pub const KNOWN_PAGES: [&str; 8] = [
    "home",
    "how-it-works",
    "problem",
    "solution",
    "patents",
    "partners",
    "investors",
    "contact",
];

/// Whether `page` is one of [`KNOWN_PAGES`]
pub fn is_known_page(page: &str) -> bool {
    KNOWN_PAGES.contains(&page)
}

/// Named, ordered, page-scoped unit of HTML
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentBlock {
    pub id: ContentBlockId,
    /// Unique and immutable once created
    pub slug: String,
    pub title: String,
    pub html_content: String,
    #[cfg_attr(feature = "serde", serde(default = "default_page"))]
    pub page: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: i32,
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub is_active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub updated_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(feature = "serde")]
fn default_page() -> String {
    DEFAULT_PAGE.to_string()
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

/// Content block creation payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentBlockDraft {
    pub slug: String,
    pub title: String,
    pub html_content: String,
    pub page: String,
    pub order: i32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub is_active: Option<bool>,
}

impl ContentBlockDraft {
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        html_content: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            html_content: html_content.into(),
            page: DEFAULT_PAGE.to_string(),
            order: 0,
            is_active: None,
        }
    }
}

/// Replacement payload for an existing block. Has no slug field: the slug is
/// taken from the addressed block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentBlockUpdate {
    pub title: String,
    pub html_content: String,
    pub page: String,
    pub order: i32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub is_active: Option<bool>,
}

impl From<&ContentBlock> for ContentBlockUpdate {
    fn from(value: &ContentBlock) -> Self {
        Self {
            title: value.title.clone(),
            html_content: value.html_content.clone(),
            page: value.page.clone(),
            order: value.order,
            is_active: Some(value.is_active),
        }
    }
}

/// One `{slug, order}` pair of a reorder batch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorderEntry {
    pub slug: String,
    pub order: i32,
}

/// Body of `POST /content/reorder/`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorderRequest {
    pub blocks: Vec<ReorderEntry>,
}

/// Reply of `POST /content/reorder/`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorderResponse {
    pub message: String,
    pub updated_count: u32,
}
