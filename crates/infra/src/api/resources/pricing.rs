use pokitdok_domain::{Envelope, Params, Result};

use crate::api::PokitDokClient;

impl PokitDokClient {
    /// Cash prices for a procedure code in a geographic area
    ///
    /// Typical params: `cpt_code`, `zip_code`.
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn cash_prices(&self, params: &Params) -> Result<Envelope> {
        self.get("/prices/cash", params).await
    }

    /// Insurance prices for a procedure code in a geographic area
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn insurance_prices(&self, params: &Params) -> Result<Envelope> {
        self.get("/prices/insurance", params).await
    }
}
