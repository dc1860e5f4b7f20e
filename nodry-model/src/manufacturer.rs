use crate::ids::ManufacturerId;
use chrono::{DateTime, Utc};

/// Manufacturer / prototype partner as listed on the partners page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Manufacturer {
    pub id: ManufacturerId,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    pub phone: String,
    pub email: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub website: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

/// Writable manufacturer fields, used for both create (`POST`) and full
/// replacement (`PUT`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManufacturerDraft {
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub website: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub active: Option<bool>,
}

impl From<&Manufacturer> for ManufacturerDraft {
    fn from(value: &Manufacturer) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            address: value.address.clone().unwrap_or_default(),
            phone: value.phone.clone(),
            email: value.email.clone(),
            website: value.website.clone(),
            active: Some(value.active),
        }
    }
}
