//! Terminal rendering for command results.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use nodry_model::{ContentBlock, Document, Lead, Manufacturer, RfqSubmission};
use serde::Serialize;

fn short_time(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .context("failed to render response")?;
    println!("{text}");
    Ok(())
}

pub fn manufacturers(items: &[Manufacturer]) {
    if items.is_empty() {
        println!("No manufacturers.");
        return;
    }
    for m in items {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            m.id,
            m.name,
            m.email,
            m.phone,
            if m.active { "active" } else { "inactive" }
        );
    }
}

pub fn documents(items: &[Document]) {
    if items.is_empty() {
        println!("No documents.");
        return;
    }
    for d in items {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            d.id,
            d.category.label(),
            d.file_name,
            or_dash(d.link()),
            short_time(d.created_at)
        );
    }
}

pub fn leads(items: &[Lead]) {
    if items.is_empty() {
        println!("No leads.");
        return;
    }
    for lead in items {
        println!(
            "{}\t{}\t{} <{}>\t{}",
            short_time(lead.created_at),
            lead.inquiry_type.label(),
            lead.full_name,
            lead.email,
            or_dash(lead.phone.as_deref())
        );
    }
}

pub fn rfqs(items: &[RfqSubmission]) {
    if items.is_empty() {
        println!("No RFQ submissions.");
        return;
    }
    for rfq in items {
        let attachment = rfq.attachment_url.as_deref().or(rfq.attachment.as_deref());
        println!(
            "{}\t{} <{}>\t{}\t{}",
            short_time(rfq.created_at),
            rfq.full_name,
            rfq.email,
            or_dash(rfq.company.as_deref()),
            or_dash(attachment)
        );
    }
}

pub fn content_blocks<'a>(items: impl IntoIterator<Item = &'a ContentBlock>) {
    let mut any = false;
    for block in items {
        any = true;
        println!(
            "{}\t{}\t{}\t{}\t{}",
            block.page,
            block.order,
            block.slug,
            block.title,
            if block.is_active { "active" } else { "hidden" }
        );
    }
    if !any {
        println!("No content blocks.");
    }
}

/// Write `bytes` to `path`, or to stdout when no path is given.
pub async fn bytes(bytes: &[u8], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.flush().context("failed to write to stdout")?;
        }
    }
    Ok(())
}
