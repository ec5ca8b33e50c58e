//! Pharmacy benefits

use pokitdok_domain::{Envelope, Params, Result};

use super::item_path;
use crate::api::PokitDokClient;

impl PokitDokClient {
    /// Pharmacy plan information for a member
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn pharmacy_plans(&self, params: &Params) -> Result<Envelope> {
        self.get("/pharmacy/plans", params).await
    }

    /// Formulary status of a drug under a plan
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn pharmacy_formulary(&self, params: &Params) -> Result<Envelope> {
        self.get("/pharmacy/formulary", params).await
    }

    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn pharmacy_drug_cost(&self, params: &Params) -> Result<Envelope> {
        self.get("/pharmacy/drug/cost", params).await
    }

    /// In-network pharmacies, or one pharmacy by NPI
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn pharmacy_network(&self, npi: Option<&str>, params: &Params) -> Result<Envelope> {
        self.get(&item_path("/pharmacy/network/", npi), params).await
    }
}
