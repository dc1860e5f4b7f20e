//! Client-side form validation
//!
//! Everything here runs before a request is built; a failure never reaches
//! the network.

use std::path::Path;

use nodry_model::NewLead;

use crate::error::{ClientError, ClientResult, ValidationError};
use crate::request::FormPart;

/// Default RFQ attachment ceiling: 10 MB
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// A file picked for upload
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a file from disk. The file name sent to the backend is the
    /// path's final component.
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            ClientError::File {
                path: path.display().to_string(),
                source,
            }
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn into_part(self, field: &str) -> FormPart {
        FormPart::File {
            name: field.to_string(),
            file_name: self.file_name,
            mime: self.mime,
            bytes: self.bytes,
        }
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "dwg" => "image/vnd.dwg",
        "dxf" => "image/vnd.dxf",
        "step" | "stp" => "model/step",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Reject an attachment over `limit` bytes.
pub fn check_attachment_size(
    attachment: &Attachment,
    limit: u64,
) -> Result<(), ValidationError> {
    if attachment.size() > limit {
        return Err(ValidationError::AttachmentTooLarge {
            size: attachment.size(),
            limit,
        });
    }
    Ok(())
}

/// Minimal address check: something before `@` and a non-empty domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(ValidationError::InvalidEmail(email.to_string())),
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

pub fn validate_lead(lead: &NewLead) -> Result<(), ValidationError> {
    require(&lead.full_name, "full_name")?;
    require(&lead.email, "email")?;
    validate_email(&lead.email)?;
    require(&lead.message, "message")
}

/// RFQ form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RfqDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub message: String,
    attachment: Option<Attachment>,
}

impl RfqDraft {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Pick a file. An oversized file is refused and the draft keeps its
    /// previous attachment.
    pub fn attach(
        &mut self,
        attachment: Attachment,
        limit: u64,
    ) -> Result<(), ValidationError> {
        check_attachment_size(&attachment, limit)?;
        self.attachment = Some(attachment);
        Ok(())
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    pub fn validate(&self, limit: u64) -> Result<(), ValidationError> {
        require(&self.full_name, "full_name")?;
        require(&self.email, "email")?;
        validate_email(&self.email)?;
        require(&self.phone, "phone")?;
        require(&self.message, "message")?;
        if let Some(attachment) = &self.attachment {
            check_attachment_size(attachment, limit)?;
        }
        Ok(())
    }

    pub(crate) fn to_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("full_name", self.full_name.trim()),
            FormPart::text("email", self.email.trim()),
            FormPart::text("phone", self.phone.trim()),
            FormPart::text("message", self.message.as_str()),
        ];
        if let Some(company) = self.company.as_deref().map(str::trim)
            && !company.is_empty()
        {
            parts.push(FormPart::text("company", company));
        }
        if let Some(attachment) = self.attachment.clone() {
            parts.push(attachment.into_part("attachment"));
        }
        parts
    }
}
