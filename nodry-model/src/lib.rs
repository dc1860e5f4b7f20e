//! Records exchanged between the No Dry Starts site, its admin panel and the
//! REST backend.
#![allow(missing_docs)]

pub mod auth;
pub mod content;
pub mod document;
pub mod error;
pub mod ids;
pub mod inquiry;
pub mod listing;
pub mod manufacturer;
pub mod ordering;

// Intentionally curated re-exports for downstream consumers.
pub use auth::{AccessToken, Credentials, RefreshRequest, TokenPair};
pub use content::{
    ContentBlock, ContentBlockDraft, ContentBlockUpdate, DEFAULT_PAGE,
    KNOWN_PAGES, ReorderEntry, ReorderRequest, ReorderResponse,
};
pub use document::{
    Document, DocumentCategory, DocumentDraft, DocumentUpdate,
};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{ContentBlockId, DocumentId, LeadId, ManufacturerId, RfqId};
pub use inquiry::{
    InquiryType, InvestorDownloadRequest, InvestorDownloadTicket, Lead,
    NewLead, RfqSubmission,
};
pub use listing::Listing;
pub use manufacturer::{Manufacturer, ManufacturerDraft};
pub use ordering::{move_within_page, page_view};
