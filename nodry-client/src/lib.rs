//! No Dry Starts API client
//!
//! Typed access to the site backend used by the public forms and the admin
//! tooling:
//! - [`ApiClient`] attaches the bearer token, refreshes it once on a 401
//!   (sharing a single in-flight refresh between concurrent callers) and
//!   retries the request.
//! - [`session`] persists the token pair between runs.
//! - [`board::ContentBoard`] drives optimistic content block reordering with
//!   rollback by reload.
//! - [`forms`] validates RFQ and lead input before anything is sent.

pub mod board;
pub mod client;
pub mod error;
pub mod forms;
pub mod request;
pub mod resources;
pub mod session;
pub mod single_flight;

pub use board::{ContentApi, ContentBoard, ReorderError};
pub use client::{ApiClient, ClientOptions};
pub use error::{
    ClientError, ClientResult, RefreshFailure, SessionError, ValidationError,
};
pub use forms::{Attachment, DEFAULT_MAX_ATTACHMENT_BYTES, RfqDraft};
pub use request::{Auth, FormPart, Payload, RequestOptions};
pub use resources::DocumentUpload;
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionStore,
};
