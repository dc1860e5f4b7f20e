use anyhow::{Context, Result};
use nodry_client::{ApiClient, Attachment, RfqDraft};
use nodry_model::{InquiryType, InvestorDownloadRequest, Lead, NewLead};

use crate::cli::{InvestorAction, LeadAction, RfqAction};
use crate::output;

fn of_type(mut leads: Vec<Lead>, kind: Option<InquiryType>) -> Vec<Lead> {
    if let Some(kind) = kind {
        leads.retain(|lead| lead.inquiry_type == kind);
    }
    leads
}

pub async fn leads(client: &ApiClient, action: LeadAction) -> Result<()> {
    match action {
        LeadAction::List { inquiry_type } => {
            let items = client.leads().await.context("failed to load leads")?;
            output::leads(&of_type(items, inquiry_type));
        }
        LeadAction::Export { output: path } => {
            let csv = client
                .export_leads_csv()
                .await
                .context("failed to export leads")?;
            output::bytes(&csv, path.as_deref()).await?;
        }
        LeadAction::Create {
            name,
            email,
            phone,
            message,
            inquiry_type,
        } => {
            let lead = NewLead {
                full_name: name,
                email,
                phone,
                message,
                inquiry_type,
            };
            let created = client
                .create_lead(&lead)
                .await
                .context("failed to submit lead")?;
            println!(
                "Recorded {} from {} <{}>.",
                created.inquiry_type.label(),
                created.full_name,
                created.email
            );
        }
    }
    Ok(())
}

pub async fn rfq(client: &ApiClient, action: RfqAction) -> Result<()> {
    match action {
        RfqAction::List => {
            let items = client
                .rfq_submissions()
                .await
                .context("failed to load RFQ submissions")?;
            output::rfqs(&items);
        }
        RfqAction::Export { output: path } => {
            let csv = client
                .export_rfqs_csv()
                .await
                .context("failed to export RFQ submissions")?;
            output::bytes(&csv, path.as_deref()).await?;
        }
        RfqAction::Submit {
            name,
            email,
            phone,
            company,
            message,
            attachment,
        } => {
            let mut draft = RfqDraft::new(name, email, phone, message);
            if let Some(company) = company {
                draft = draft.with_company(company);
            }
            if let Some(path) = attachment {
                let file = Attachment::from_path(&path).await?;
                draft
                    .attach(file, client.max_attachment_bytes())
                    .with_context(|| {
                        format!("cannot attach {}", path.display())
                    })?;
            }
            let submission = client
                .submit_rfq(&draft)
                .await
                .context("failed to submit RFQ")?;
            println!("RFQ received for {}.", submission.email);
        }
    }
    Ok(())
}

pub async fn investor(client: &ApiClient, action: InvestorAction) -> Result<()> {
    match action {
        InvestorAction::Request { email, name } => {
            let ticket = client
                .request_investor_download(&InvestorDownloadRequest {
                    email,
                    name,
                })
                .await
                .context("failed to request investor deck")?;
            println!(
                "{} (link expires {})",
                ticket.message,
                ticket.expires_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        InvestorAction::Download { token, output: path } => {
            let deck = client
                .download_investor_document(&token)
                .await
                .context("failed to download investor deck")?;
            output::bytes(&deck, Some(&path)).await?;
        }
    }
    Ok(())
}
