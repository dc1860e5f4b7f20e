//! Page-scoped ordering of content blocks.
//!
//! Blocks are displayed per page sorted by `(order, slug)`. A move rewrites
//! every block of the page so that orders become the dense sequence
//! `0..N-1`; blocks on other pages are never touched.

use crate::content::{ContentBlock, ReorderEntry};
use crate::error::{ModelError, Result};

/// Indices into `blocks` of the blocks on `page`, in display order
fn page_indices(blocks: &[ContentBlock], page: &str) -> Vec<usize> {
    let mut indices: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.page == page)
        .map(|(idx, _)| idx)
        .collect();
    indices.sort_by(|&a, &b| {
        let (a, b) = (&blocks[a], &blocks[b]);
        a.order.cmp(&b.order).then_with(|| a.slug.cmp(&b.slug))
    });
    indices
}

/// Blocks on `page` in display order
pub fn page_view<'a>(
    blocks: &'a [ContentBlock],
    page: &str,
) -> Vec<&'a ContentBlock> {
    page_indices(blocks, page)
        .into_iter()
        .map(|idx| &blocks[idx])
        .collect()
}

/// Moves the block at display position `from` to position `to` within
/// `page`, renumbers the page densely and returns the batch to persist.
///
/// `blocks` is left untouched when either index is out of range.
pub fn move_within_page(
    blocks: &mut [ContentBlock],
    page: &str,
    from: usize,
    to: usize,
) -> Result<Vec<ReorderEntry>> {
    let mut indices = page_indices(blocks, page);
    let len = indices.len();
    for index in [from, to] {
        if index >= len {
            return Err(ModelError::IndexOutOfRange { index, len });
        }
    }

    let moved = indices.remove(from);
    indices.insert(to, moved);

    let batch = indices
        .into_iter()
        .enumerate()
        .map(|(position, idx)| {
            let block = &mut blocks[idx];
            block.order = position as i32;
            ReorderEntry {
                slug: block.slug.clone(),
                order: block.order,
            }
        })
        .collect();
    Ok(batch)
}
