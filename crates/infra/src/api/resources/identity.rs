//! Identity management

use pokitdok_domain::{Envelope, Params, Result};
use serde::Serialize;

use super::{item_path, segment};
use crate::api::PokitDokClient;

impl PokitDokClient {
    /// Register a new identity
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn create_identity<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/identity/", body).await
    }

    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn update_identity<B>(&self, identity_uuid: &str, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.put(&format!("/identity/{}", segment(identity_uuid)), body).await
    }

    /// Fetch an identity by uuid, or search by `params` (e.g. `last_name`)
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn get_identity(
        &self,
        identity_uuid: Option<&str>,
        params: &Params,
    ) -> Result<Envelope> {
        self.get(&item_path("/identity/", identity_uuid), params).await
    }

    /// Change history of an identity, or one historical version
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn identity_history(
        &self,
        identity_uuid: &str,
        version: Option<u32>,
    ) -> Result<Envelope> {
        let history = format!("/identity/{}/history", segment(identity_uuid));
        let path = match version {
            Some(version) => format!("{history}/{version}"),
            None => history,
        };
        self.get(&path, &Params::new()).await
    }

    /// Probabilistic identity matching
    ///
    /// # Errors
    ///
    /// Auth and transport failures only
    pub async fn identity_match<B>(&self, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        self.post("/identity/match", body).await
    }
}
