//! Platform resources
//!
//! Each submodule adds `impl PokitDokClient` methods for one area of the
//! platform. Methods only shape parameters and paths; the dispatcher does the
//! rest and returns the envelope unchanged.

mod activities;
mod claims;
mod directory;
mod eligibility;
mod enrollment;
mod identity;
mod pharmacy;
mod pricing;
mod scheduling;

use std::borrow::Cow;

/// Percent-encode an identifier for use as a single path segment
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// `collection` as is, or `collection/{id}` when an id is given
///
/// Collections are written with their trailing slash (`/providers/`).
pub(crate) fn item_path(collection: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}/{}", collection.trim_end_matches('/'), segment(id)),
        None => collection.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_path_without_id_keeps_collection() {
        assert_eq!(item_path("/providers/", None), "/providers/");
    }

    #[test]
    fn item_path_appends_encoded_id() {
        assert_eq!(item_path("/providers/", Some("1467560003")), "/providers/1467560003");
        assert_eq!(item_path("/mpc/", Some("a b/c")), "/mpc/a%20b%2Fc");
    }
}
