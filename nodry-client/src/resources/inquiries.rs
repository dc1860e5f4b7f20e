use log::info;
use nodry_model::{
    InvestorDownloadRequest, InvestorDownloadTicket, Lead, Listing, NewLead,
    RfqSubmission,
};
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderValue};

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::forms::{RfqDraft, validate_email, validate_lead};
use crate::request::RequestOptions;

const LEADS: &str = "/leads/";
const LEADS_CSV: &str = "/leads/export_csv/";
const RFQ: &str = "/rfq/";
const RFQ_CSV: &str = "/rfq/export_csv/";
const INVESTOR_REQUEST: &str = "/investor/request-download/";

fn csv_options() -> RequestOptions {
    RequestOptions::get().header(ACCEPT, HeaderValue::from_static("text/csv"))
}

impl ApiClient {
    pub async fn leads(&self) -> ClientResult<Vec<Lead>> {
        let listing: Listing<Lead> =
            self.request(LEADS, RequestOptions::get()).await?;
        Ok(listing.into_vec())
    }

    /// Public contact form submission.
    pub async fn create_lead(&self, lead: &NewLead) -> ClientResult<Lead> {
        validate_lead(lead)?;
        self.request(LEADS, RequestOptions::post(lead)?).await
    }

    pub async fn export_leads_csv(&self) -> ClientResult<Vec<u8>> {
        self.request_bytes(LEADS_CSV, csv_options()).await
    }

    pub async fn rfq_submissions(&self) -> ClientResult<Vec<RfqSubmission>> {
        let listing: Listing<RfqSubmission> =
            self.request(RFQ, RequestOptions::get()).await?;
        Ok(listing.into_vec())
    }

    /// Submit the public RFQ form. Validation (including the attachment
    /// ceiling) happens before anything is sent.
    pub async fn submit_rfq(
        &self,
        draft: &RfqDraft,
    ) -> ClientResult<RfqSubmission> {
        draft.validate(self.max_attachment_bytes())?;
        let options =
            RequestOptions::multipart(Method::POST, draft.to_parts())
                .anonymous();
        let submission: RfqSubmission = self.request(RFQ, options).await?;
        info!("[ApiClient] RFQ submitted for {}", draft.email.trim());
        Ok(submission)
    }

    pub async fn export_rfqs_csv(&self) -> ClientResult<Vec<u8>> {
        self.request_bytes(RFQ_CSV, csv_options()).await
    }

    /// Ask for a time-limited investor deck link to be emailed.
    pub async fn request_investor_download(
        &self,
        request: &InvestorDownloadRequest,
    ) -> ClientResult<InvestorDownloadTicket> {
        validate_email(&request.email)?;
        let options = RequestOptions::post(request)?.anonymous();
        self.request(INVESTOR_REQUEST, options).await
    }

    /// Fetch the investor document behind an emailed token.
    pub async fn download_investor_document(
        &self,
        token: &str,
    ) -> ClientResult<Vec<u8>> {
        let endpoint = format!(
            "/investor/download/{}/",
            urlencoding::encode(token.trim())
        );
        let options = RequestOptions::get()
            .header(ACCEPT, HeaderValue::from_static("*/*"))
            .anonymous();
        self.request_bytes(&endpoint, options).await
    }
}
