use anyhow::{Context, Result};
use nodry_client::ApiClient;

/// Record counts shown on the admin landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub leads: usize,
    pub rfqs: usize,
    pub manufacturers: usize,
    pub documents: usize,
}

impl Summary {
    pub fn rows(&self) -> [(&'static str, usize); 4] {
        [
            ("Leads", self.leads),
            ("RFQ submissions", self.rfqs),
            ("Manufacturers", self.manufacturers),
            ("Documents", self.documents),
        ]
    }
}

pub async fn summary(client: &ApiClient) -> Result<()> {
    let (leads, rfqs, manufacturers, documents) = tokio::try_join!(
        client.leads(),
        client.rfq_submissions(),
        client.manufacturers(),
        client.documents(None),
    )
    .context("failed to load dashboard counts")?;

    let summary = Summary {
        leads: leads.len(),
        rfqs: rfqs.len(),
        manufacturers: manufacturers.len(),
        documents: documents.len(),
    };
    tracing::debug!(?summary, "dashboard loaded");
    for (label, count) in summary.rows() {
        println!("{label:<16}{count}");
    }
    Ok(())
}
