use anyhow::{Context, Result};
use nodry_client::{ApiClient, Attachment, DocumentUpload};
use nodry_model::{DocumentDraft, DocumentUpdate, ManufacturerDraft};

use crate::cli::{DocumentAction, ManufacturerAction, ManufacturerPatch};
use crate::output;

fn apply_patch(draft: &mut ManufacturerDraft, patch: ManufacturerPatch) {
    let ManufacturerPatch {
        name,
        description,
        address,
        phone,
        email,
        website,
        active,
    } = patch;
    if let Some(name) = name {
        draft.name = name;
    }
    if let Some(description) = description {
        draft.description = description;
    }
    if let Some(address) = address {
        draft.address = address;
    }
    if let Some(phone) = phone {
        draft.phone = phone;
    }
    if let Some(email) = email {
        draft.email = email;
    }
    if let Some(website) = website {
        draft.website = (!website.trim().is_empty()).then_some(website);
    }
    if active.is_some() {
        draft.active = active;
    }
}

pub async fn manufacturers(
    client: &ApiClient,
    action: ManufacturerAction,
) -> Result<()> {
    match action {
        ManufacturerAction::List => {
            let items = client
                .manufacturers()
                .await
                .context("failed to load manufacturers")?;
            output::manufacturers(&items);
        }
        ManufacturerAction::Show { id } => {
            let item = client
                .manufacturer(id)
                .await
                .with_context(|| format!("failed to load manufacturer {id}"))?;
            output::json(&item)?;
        }
        ManufacturerAction::Create(fields) => {
            let draft = ManufacturerDraft {
                name: fields.name,
                description: fields.description,
                address: fields.address,
                phone: fields.phone,
                email: fields.email,
                website: fields.website,
                active: Some(!fields.inactive),
            };
            let created = client
                .create_manufacturer(&draft)
                .await
                .context("failed to create manufacturer")?;
            tracing::info!(id = %created.id, "manufacturer created");
            println!("Created manufacturer {} ({}).", created.name, created.id);
        }
        ManufacturerAction::Update { id, patch } => {
            let current = client
                .manufacturer(id)
                .await
                .with_context(|| format!("failed to load manufacturer {id}"))?;
            let mut draft = ManufacturerDraft::from(&current);
            apply_patch(&mut draft, patch);
            let updated = client
                .update_manufacturer(id, &draft)
                .await
                .context("failed to update manufacturer")?;
            println!("Updated manufacturer {} ({}).", updated.name, updated.id);
        }
        ManufacturerAction::Delete { id } => {
            client
                .delete_manufacturer(id)
                .await
                .with_context(|| format!("failed to delete manufacturer {id}"))?;
            println!("Deleted manufacturer {id}.");
        }
    }
    Ok(())
}

pub async fn documents(client: &ApiClient, action: DocumentAction) -> Result<()> {
    match action {
        DocumentAction::List { category } => {
            let items = client
                .documents(category)
                .await
                .context("failed to load documents")?;
            output::documents(&items);
        }
        DocumentAction::Show { id } => {
            let item = client
                .document(id)
                .await
                .with_context(|| format!("failed to load document {id}"))?;
            output::json(&item)?;
        }
        DocumentAction::Upload {
            path,
            category,
            name,
            description,
        } => {
            let file = Attachment::from_path(&path).await?;
            let mut upload = DocumentUpload::new(file, category);
            upload.file_name = name;
            upload.description = description;
            let created = client
                .upload_document(upload)
                .await
                .context("failed to upload document")?;
            tracing::info!(id = %created.id, "document uploaded");
            println!("Uploaded {} ({}).", created.file_name, created.id);
        }
        DocumentAction::Create {
            file_name,
            category,
            description,
        } => {
            let mut draft = DocumentDraft::new(file_name, category);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let created = client
                .create_document(&draft)
                .await
                .context("failed to create document")?;
            println!("Created document {} ({}).", created.file_name, created.id);
        }
        DocumentAction::Update {
            id,
            file_name,
            category,
            description,
        } => {
            let current = client
                .document(id)
                .await
                .with_context(|| format!("failed to load document {id}"))?;
            let mut update = DocumentUpdate::from(&current);
            if let Some(file_name) = file_name {
                update.file_name = file_name;
            }
            if let Some(category) = category {
                update.category = category;
            }
            if let Some(description) = description {
                update.description =
                    (!description.trim().is_empty()).then_some(description);
            }
            let updated = client
                .update_document(id, &update)
                .await
                .context("failed to update document")?;
            println!("Updated document {} ({}).", updated.file_name, updated.id);
        }
        DocumentAction::Delete { id } => {
            client
                .delete_document(id)
                .await
                .with_context(|| format!("failed to delete document {id}"))?;
            println!("Deleted document {id}.");
        }
    }
    Ok(())
}
