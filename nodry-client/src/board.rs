//! Content block ordering board
//!
//! Holds the full list of content blocks plus the page being edited. A move
//! is applied to the in-memory list first and then persisted as one batch; if
//! persisting fails the list is reloaded from the backend.

use async_trait::async_trait;
use log::{info, warn};
use nodry_model::{
    ContentBlock, DEFAULT_PAGE, ModelError, ReorderEntry, ReorderResponse,
    move_within_page, page_view,
};
use thiserror::Error;

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Backend operations the board depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn fetch_blocks(&self) -> ClientResult<Vec<ContentBlock>>;

    async fn persist_order(
        &self,
        blocks: Vec<ReorderEntry>,
    ) -> ClientResult<ReorderResponse>;
}

#[async_trait]
impl ContentApi for ApiClient {
    async fn fetch_blocks(&self) -> ClientResult<Vec<ContentBlock>> {
        self.content_blocks().await
    }

    async fn persist_order(
        &self,
        blocks: Vec<ReorderEntry>,
    ) -> ClientResult<ReorderResponse> {
        self.reorder_content_blocks(blocks).await
    }
}

#[derive(Debug, Error)]
pub enum ReorderError {
    /// Indices did not address the page; nothing changed
    #[error("Cannot move block: {0}")]
    Invalid(#[from] ModelError),

    /// Persisting failed and the list was reloaded from the backend
    #[error("Failed to save order: {error}")]
    RolledBack {
        #[source]
        error: ClientError,
    },

    /// Persisting failed and so did the reload; the board still shows the
    /// unsaved order
    #[error("Failed to save order: {error} (reload also failed: {refetch})")]
    Stale {
        #[source]
        error: ClientError,
        refetch: ClientError,
    },
}

impl ReorderError {
    pub fn requires_login(&self) -> bool {
        match self {
            ReorderError::Invalid(_) => false,
            ReorderError::RolledBack { error } => error.requires_login(),
            ReorderError::Stale { error, refetch } => {
                error.requires_login() || refetch.requires_login()
            }
        }
    }
}

#[derive(Debug)]
pub struct ContentBoard<A> {
    api: A,
    blocks: Vec<ContentBlock>,
    page: String,
}

impl<A: ContentApi> ContentBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            blocks: Vec::new(),
            page: DEFAULT_PAGE.to_string(),
        }
    }

    /// Replace the in-memory list with the backend's.
    pub async fn load(&mut self) -> ClientResult<()> {
        self.blocks = self.api.fetch_blocks().await?;
        Ok(())
    }

    pub fn select_page(&mut self, page: impl Into<String>) {
        self.page = page.into();
    }

    pub fn selected_page(&self) -> &str {
        &self.page
    }

    /// Every block, across all pages, in backend order
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Blocks of the selected page in display order
    pub fn visible(&self) -> Vec<&ContentBlock> {
        page_view(&self.blocks, &self.page)
    }

    /// Move the block at display index `from` to `to` within the selected
    /// page and persist the renumbered page.
    pub async fn move_block(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<ReorderResponse, ReorderError> {
        let batch = move_within_page(&mut self.blocks, &self.page, from, to)?;
        info!(
            "[ContentBoard] Moving block {} -> {} on page '{}'",
            from, to, self.page
        );

        let error = match self.api.persist_order(batch).await {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        warn!("[ContentBoard] Saving order failed, reloading: {}", error);
        match self.api.fetch_blocks().await {
            Ok(blocks) => {
                self.blocks = blocks;
                Err(ReorderError::RolledBack { error })
            }
            Err(refetch) => Err(ReorderError::Stale { error, refetch }),
        }
    }
}
