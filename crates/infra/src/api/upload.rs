//! Reading X12 payloads from disk

use std::path::Path;

use pokitdok_domain::constants::DEFAULT_X12_FILE_NAME;
use pokitdok_domain::{Result, X12File};
use tracing::debug;

use crate::errors::InfraError;

/// Read an X12 file for upload, keeping its file name for the multipart part
///
/// # Errors
///
/// Returns `Io` if the file cannot be read
pub async fn load_x12_file(path: impl AsRef<Path>) -> Result<X12File> {
    let path = path.as_ref();
    let content = tokio::fs::read(path).await.map_err(InfraError::from)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_X12_FILE_NAME);

    debug!(file = file_name, bytes = content.len(), "loaded X12 payload");
    Ok(X12File::new(file_name, content))
}
