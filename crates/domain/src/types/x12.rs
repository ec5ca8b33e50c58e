//! X12 EDI payloads uploaded as multipart files

use crate::constants::DEFAULT_X12_FILE_NAME;

/// An X12 document (837 claim, 834 enrollment, ...) ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X12File {
    file_name: String,
    content: Vec<u8>,
}

impl X12File {
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self { file_name: file_name.into(), content: content.into() }
    }

    /// Wrap raw X12 text that did not come from a file.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(DEFAULT_X12_FILE_NAME, text.into().into_bytes())
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.file_name, self.content)
    }
}
