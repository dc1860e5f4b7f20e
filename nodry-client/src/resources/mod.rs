//! Typed wrappers over [`ApiClient::request`](crate::ApiClient::request), one
//! module per backend resource.

pub mod content;
pub mod documents;
pub mod inquiries;
pub mod manufacturers;

pub use documents::DocumentUpload;
