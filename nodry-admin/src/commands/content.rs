use anyhow::{Context, Result};
use nodry_client::{ApiClient, ContentBoard};
use nodry_model::content::is_known_page;
use nodry_model::{ContentBlockDraft, ContentBlockUpdate, page_view};

use crate::cli::{ContentAction, HtmlSource};
use crate::output;

async fn read_html(source: HtmlSource) -> Result<Option<String>> {
    match source {
        HtmlSource {
            html: Some(html), ..
        } => Ok(Some(html)),
        HtmlSource {
            html_file: Some(path),
            ..
        } => tokio::fs::read_to_string(&path)
            .await
            .map(Some)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => Ok(None),
    }
}

fn warn_unknown_page(page: &str) {
    if !is_known_page(page) {
        tracing::warn!(page, "page is not rendered by the site");
    }
}

pub async fn content(client: &ApiClient, action: ContentAction) -> Result<()> {
    match action {
        ContentAction::List { page } => {
            let blocks = client
                .content_blocks()
                .await
                .context("failed to load content blocks")?;
            match page {
                Some(page) => output::content_blocks(page_view(&blocks, &page)),
                None => output::content_blocks(&blocks),
            }
        }
        ContentAction::Show { slug } => {
            let block = client
                .content_block(&slug)
                .await
                .with_context(|| format!("failed to load block '{slug}'"))?;
            output::json(&block)?;
        }
        ContentAction::Create {
            slug,
            title,
            html,
            page,
            order,
            inactive,
        } => {
            warn_unknown_page(&page);
            let html_content = read_html(html).await?.unwrap_or_default();
            let mut draft = ContentBlockDraft::new(slug, title, html_content);
            draft.page = page;
            draft.order = order;
            draft.is_active = Some(!inactive);
            let created = client
                .create_content_block(&draft)
                .await
                .context("failed to create content block")?;
            println!("Created block '{}' on {}.", created.slug, created.page);
        }
        ContentAction::Update {
            slug,
            title,
            html,
            page,
            order,
            active,
        } => {
            let current = client
                .content_block(&slug)
                .await
                .with_context(|| format!("failed to load block '{slug}'"))?;
            let mut update = ContentBlockUpdate::from(&current);
            if let Some(title) = title {
                update.title = title;
            }
            if let Some(html) = read_html(html).await? {
                update.html_content = html;
            }
            if let Some(page) = page {
                warn_unknown_page(&page);
                update.page = page;
            }
            if let Some(order) = order {
                update.order = order;
            }
            if active.is_some() {
                update.is_active = active;
            }
            let updated = client
                .update_content_block(&slug, &update)
                .await
                .with_context(|| format!("failed to update block '{slug}'"))?;
            println!("Updated block '{}'.", updated.slug);
        }
        ContentAction::Delete { slug } => {
            client
                .delete_content_block(&slug)
                .await
                .with_context(|| format!("failed to delete block '{slug}'"))?;
            println!("Deleted block '{slug}'.");
        }
        ContentAction::Move { page, from, to } => {
            let mut board = ContentBoard::new(client.clone());
            board
                .load()
                .await
                .context("failed to load content blocks")?;
            board.select_page(page);
            let saved = board.move_block(from, to).await.with_context(|| {
                format!("failed to move block {from} -> {to}")
            })?;
            tracing::info!(updated = saved.updated_count, "order saved");
            println!("{}", saved.message);
            output::content_blocks(board.visible());
        }
    }
    Ok(())
}
