use log::info;
use nodry_model::{
    ContentBlock, ContentBlockDraft, ContentBlockUpdate, Listing, ReorderEntry,
    ReorderRequest, ReorderResponse,
};
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::{ClientResult, ValidationError};
use crate::request::RequestOptions;

const CONTENT: &str = "/content/";
const REORDER: &str = "/content/reorder/";

fn block_path(slug: &str) -> Result<String, ValidationError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(ValidationError::MissingField("slug"));
    }
    Ok(format!("{CONTENT}{}/", urlencoding::encode(slug)))
}

/// `PUT` body: the update fields plus the path slug, so a block can never be
/// renamed through an update.
#[derive(Serialize)]
struct SlugPinnedUpdate<'a> {
    slug: &'a str,
    #[serde(flatten)]
    update: &'a ContentBlockUpdate,
}

impl ApiClient {
    pub async fn content_blocks(&self) -> ClientResult<Vec<ContentBlock>> {
        let listing: Listing<ContentBlock> =
            self.request(CONTENT, RequestOptions::get()).await?;
        Ok(listing.into_vec())
    }

    pub async fn content_block(&self, slug: &str) -> ClientResult<ContentBlock> {
        self.request(&block_path(slug)?, RequestOptions::get())
            .await
    }

    pub async fn create_content_block(
        &self,
        draft: &ContentBlockDraft,
    ) -> ClientResult<ContentBlock> {
        if draft.slug.trim().is_empty() {
            return Err(ValidationError::MissingField("slug").into());
        }
        self.request(CONTENT, RequestOptions::post(draft)?).await
    }

    pub async fn update_content_block(
        &self,
        slug: &str,
        update: &ContentBlockUpdate,
    ) -> ClientResult<ContentBlock> {
        let path = block_path(slug)?;
        let body = SlugPinnedUpdate {
            slug: slug.trim(),
            update,
        };
        self.request(&path, RequestOptions::put(&body)?).await
    }

    pub async fn delete_content_block(&self, slug: &str) -> ClientResult<()> {
        self.request_empty(&block_path(slug)?, RequestOptions::delete())
            .await
    }

    /// Persist a batch of `{slug, order}` pairs in one call.
    pub async fn reorder_content_blocks(
        &self,
        blocks: Vec<ReorderEntry>,
    ) -> ClientResult<ReorderResponse> {
        let count = blocks.len();
        let body = ReorderRequest { blocks };
        let response: ReorderResponse =
            self.request(REORDER, RequestOptions::post(&body)?).await?;
        info!(
            "[ApiClient] Reordered {} content blocks ({} updated)",
            count, response.updated_count
        );
        Ok(response)
    }
}
