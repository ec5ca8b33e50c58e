//! Claims, CCD and code conversion endpoints

use pokitdok_domain::{Envelope, Params, Result, X12File};
use serde::Serialize;

use super::{item_path, segment};
use crate::api::PokitDokClient;

impl PokitDokClient {
    /// Submit a Continuity of Care Document
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn ccd<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/ccd/", body).await
    }

    /// Submit a claim (X12 837)
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn claims<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/claims/", body).await
    }

    /// Claim status inquiry (X12 276/277)
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn claims_status<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/claims/status", body).await
    }

    /// Convert a raw X12 837 file into platform claim JSON
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn claims_convert(&self, x12: X12File) -> Result<Envelope> {
        self.post_multipart("/claims/convert", &Params::new(), x12).await
    }

    /// Map an ICD-9 code to its ICD-10 equivalents
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn icd_convert(&self, code: &str) -> Result<Envelope> {
        self.get(&format!("/icd/convert/{}", segment(code)), &Params::new()).await
    }

    /// Medical procedure code lookup; searches by `params` when no code is given
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn mpc(&self, code: Option<&str>, params: &Params) -> Result<Envelope> {
        self.get(&item_path("/mpc/", code), params).await
    }
}
