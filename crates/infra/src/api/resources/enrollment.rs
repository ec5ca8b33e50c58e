//! Benefit enrollment (X12 834) and raw file submission

use pokitdok_domain::{Envelope, Params, Result, X12File};
use serde::Serialize;

use super::{item_path, segment};
use crate::api::PokitDokClient;

const TRADING_PARTNER_FIELD: &str = "trading_partner_id";

impl PokitDokClient {
    /// Submit a benefit enrollment
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn enrollment<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/enrollment/", body).await
    }

    /// Upload a full enrollment snapshot (X12 834) for a trading partner
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn enrollment_snapshot(
        &self,
        trading_partner_id: &str,
        x12: X12File,
    ) -> Result<Envelope> {
        let fields = Params::new().with(TRADING_PARTNER_FIELD, trading_partner_id);
        self.post_multipart("/enrollment/snapshot", &fields, x12).await
    }

    /// List snapshots, or fetch one snapshot's metadata
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn enrollment_snapshots(
        &self,
        snapshot_id: Option<&str>,
        params: &Params,
    ) -> Result<Envelope> {
        self.get(&item_path("/enrollment/snapshot", snapshot_id), params).await
    }

    /// Member data parsed out of a snapshot
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn enrollment_snapshot_data(&self, snapshot_id: &str) -> Result<Envelope> {
        let path = format!("/enrollment/snapshot/{}/data", segment(snapshot_id));
        self.get(&path, &Params::new()).await
    }

    /// Submit a raw X12 file to a trading partner
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn files(&self, trading_partner_id: &str, x12: X12File) -> Result<Envelope> {
        let fields = Params::new().with(TRADING_PARTNER_FIELD, trading_partner_id);
        self.post_multipart("/files/", &fields, x12).await
    }
}
