use pokitdok_domain::{Envelope, Result};
use serde::Serialize;

use crate::api::PokitDokClient;

impl PokitDokClient {
    /// Benefits eligibility inquiry (X12 270/271)
    ///
    /// # Errors
    ///
    /// Auth and transport failures only; validation problems come back in
    /// `data.errors`
    pub async fn eligibility<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/eligibility/", body).await
    }

    /// Referral request (X12 278)
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn referrals<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/referrals/", body).await
    }

    /// Prior authorization request (X12 278)
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn authorizations<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/authorizations/", body).await
    }
}
