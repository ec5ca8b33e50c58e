use pokitdok_domain::{Envelope, Params, Result};

use super::item_path;
use crate::api::PokitDokClient;

impl PokitDokClient {
    /// List activities, or fetch one by id
    ///
    /// Activities track asynchronous platform work such as batch claims.
    /// `params` may filter by `parent_id`.
    ///
    /// # Errors
    ///
    /// Auth and transport failures only; see [`PokitDokClient::request`]
    pub async fn activities(&self, activity_id: Option<&str>, params: &Params) -> Result<Envelope> {
        self.get(&item_path("/activities/", activity_id), params).await
    }
}
