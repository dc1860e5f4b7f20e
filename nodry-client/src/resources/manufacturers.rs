use nodry_model::{Listing, Manufacturer, ManufacturerDraft, ManufacturerId};

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::request::RequestOptions;

const MANUFACTURERS: &str = "/manufacturers/";

fn manufacturer_path(id: ManufacturerId) -> String {
    format!("{MANUFACTURERS}{id}/")
}

impl ApiClient {
    pub async fn manufacturers(&self) -> ClientResult<Vec<Manufacturer>> {
        let listing: Listing<Manufacturer> =
            self.request(MANUFACTURERS, RequestOptions::get()).await?;
        Ok(listing.into_vec())
    }

    pub async fn manufacturer(
        &self,
        id: ManufacturerId,
    ) -> ClientResult<Manufacturer> {
        self.request(&manufacturer_path(id), RequestOptions::get())
            .await
    }

    pub async fn create_manufacturer(
        &self,
        draft: &ManufacturerDraft,
    ) -> ClientResult<Manufacturer> {
        self.request(MANUFACTURERS, RequestOptions::post(draft)?)
            .await
    }

    /// Full replacement (`PUT`) of a manufacturer's editable fields.
    pub async fn update_manufacturer(
        &self,
        id: ManufacturerId,
        draft: &ManufacturerDraft,
    ) -> ClientResult<Manufacturer> {
        self.request(&manufacturer_path(id), RequestOptions::put(draft)?)
            .await
    }

    pub async fn delete_manufacturer(
        &self,
        id: ManufacturerId,
    ) -> ClientResult<()> {
        self.request_empty(&manufacturer_path(id), RequestOptions::delete())
            .await
    }
}
