use nodry_model::{
    Document, DocumentCategory, DocumentDraft, DocumentId, DocumentUpdate,
    Listing,
};
use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::forms::Attachment;
use crate::request::{FormPart, RequestOptions};

const DOCUMENTS: &str = "/documents/";

fn document_path(id: DocumentId) -> String {
    format!("{DOCUMENTS}{id}/")
}

/// Multipart document upload
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file: Attachment,
    /// Display name; the attachment's file name when absent
    pub file_name: Option<String>,
    pub category: DocumentCategory,
    pub description: Option<String>,
}

impl DocumentUpload {
    pub fn new(file: Attachment, category: DocumentCategory) -> Self {
        Self {
            file,
            file_name: None,
            category,
            description: None,
        }
    }

    fn into_parts(self) -> Vec<FormPart> {
        let file_name = self
            .file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.file.file_name.clone());
        let mut parts = vec![
            FormPart::text("file_name", file_name),
            FormPart::text("category", self.category.as_str()),
        ];
        if let Some(description) = self.description
            && !description.trim().is_empty()
        {
            parts.push(FormPart::text("description", description));
        }
        parts.push(self.file.into_part("file"));
        parts
    }
}

impl ApiClient {
    /// List documents, optionally restricted to one category.
    pub async fn documents(
        &self,
        category: Option<DocumentCategory>,
    ) -> ClientResult<Vec<Document>> {
        let mut options = RequestOptions::get();
        if let Some(category) = category {
            options = options.query("category", category.as_str());
        }
        let listing: Listing<Document> =
            self.request(DOCUMENTS, options).await?;
        Ok(listing.into_vec())
    }

    pub async fn document(&self, id: DocumentId) -> ClientResult<Document> {
        self.request(&document_path(id), RequestOptions::get()).await
    }

    /// Register document metadata without file bytes.
    pub async fn create_document(
        &self,
        draft: &DocumentDraft,
    ) -> ClientResult<Document> {
        self.request(DOCUMENTS, RequestOptions::post(draft)?).await
    }

    pub async fn upload_document(
        &self,
        upload: DocumentUpload,
    ) -> ClientResult<Document> {
        let options =
            RequestOptions::multipart(Method::POST, upload.into_parts());
        self.request(DOCUMENTS, options).await
    }

    pub async fn update_document(
        &self,
        id: DocumentId,
        update: &DocumentUpdate,
    ) -> ClientResult<Document> {
        self.request(&document_path(id), RequestOptions::put(update)?)
            .await
    }

    pub async fn delete_document(&self, id: DocumentId) -> ClientResult<()> {
        self.request_empty(&document_path(id), RequestOptions::delete())
            .await
    }
}
