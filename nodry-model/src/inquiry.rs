//! Inbound inquiries captured by the public site: contact leads, RFQs and
//! investor deck requests.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::ids::{LeadId, RfqId};
use chrono::{DateTime, Utc};

/// Which form a lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InquiryType {
    #[default]
    Contact,
    Investor,
    Manufacturer,
    Rfq,
}

impl InquiryType {
    pub const ALL: [Self; 4] =
        [Self::Contact, Self::Investor, Self::Manufacturer, Self::Rfq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Investor => "investor",
            Self::Manufacturer => "manufacturer",
            Self::Rfq => "rfq",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Contact => "General Contact",
            Self::Investor => "Investor Inquiry",
            Self::Manufacturer => "Manufacturer Application",
            Self::Rfq => "RFQ Submission",
        }
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "inquiry type",
                value: s.to_string(),
            })
    }
}

/// General inquiry captured from a public form
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lead {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<LeadId>,
    pub full_name: String,
    pub email: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
    pub message: String,
    pub inquiry_type: InquiryType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: Option<DateTime<Utc>>,
}

/// Lead creation payload
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewLead {
    pub full_name: String,
    pub email: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub phone: Option<String>,
    pub message: String,
    pub inquiry_type: InquiryType,
}

/// Request-for-quote as stored by the backend
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RfqSubmission {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<RfqId>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub company: Option<String>,
    pub message: String,
    /// Storage reference of the uploaded attachment, if any
    #[cfg_attr(feature = "serde", serde(default))]
    pub attachment: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attachment_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /investor/request-download/`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvestorDownloadRequest {
    pub email: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
}

/// Acknowledgement of an investor deck request. The link itself is emailed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvestorDownloadTicket {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}
