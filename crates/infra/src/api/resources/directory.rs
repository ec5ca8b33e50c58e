//! Payers, plans, providers and trading partners

use pokitdok_domain::{Envelope, Params, Result};

use super::item_path;
use crate::api::PokitDokClient;

impl PokitDokClient {
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn payers(&self, params: &Params) -> Result<Envelope> {
        self.get("/payers/", params).await
    }

    /// Insurance plans, filtered by `state`, `plan_type` and similar params
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn plans(&self, params: &Params) -> Result<Envelope> {
        self.get("/plans/", params).await
    }

    /// Provider directory search, or a single provider by NPI
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn providers(&self, npi: Option<&str>, params: &Params) -> Result<Envelope> {
        self.get(&item_path("/providers/", npi), params).await
    }

    /// All trading partners, or one by id
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn trading_partners(&self, trading_partner_id: Option<&str>) -> Result<Envelope> {
        self.get(&item_path("/tradingpartners/", trading_partner_id), &Params::new()).await
    }
}
