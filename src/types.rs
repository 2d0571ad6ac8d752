//! Core types for image intake and preview

use crate::object_url::ObjectUrl;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-supplied file awaiting validation and dispatch
///
/// Mirrors what a file picker or drop event hands over: a display name, the
/// declared media type, the byte size and the contents.
#[derive(Clone)]
pub struct UploadCandidate {
    name: String,
    media_type: String,
    data: Vec<u8>,
}

impl UploadCandidate {
    pub fn new<N: Into<String>, M: Into<String>>(name: N, media_type: M, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    /// Display name as chosen by the user, e.g. `cat.jpg`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type, e.g. `image/jpeg`
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Byte size
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for UploadCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCandidate")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Timing and size information for a completed removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub original_size: u64,
    pub processed_size: u64,
}

/// Before/after pair produced by a successful removal
///
/// Both references are owned exclusively by the result and are revoked
/// when it is dropped.
#[derive(Debug)]
pub struct ProcessedResult {
    original: ObjectUrl,
    processed: ObjectUrl,
    display_name: String,
    metadata: ProcessingMetadata,
}

impl ProcessedResult {
    pub(crate) fn new(
        original: ObjectUrl,
        processed: ObjectUrl,
        display_name: String,
        metadata: ProcessingMetadata,
    ) -> Self {
        Self {
            original,
            processed,
            display_name,
            metadata,
        }
    }

    /// Preview reference to the uploaded image
    #[must_use]
    pub fn original(&self) -> &ObjectUrl {
        &self.original
    }

    /// Preview reference to the background-free image
    #[must_use]
    pub fn processed(&self) -> &ObjectUrl {
        &self.processed
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn metadata(&self) -> &ProcessingMetadata {
        &self.metadata
    }
}

/// A save action ready to hand to a download sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Suggested filename, e.g. `bg-removed-cat.png`
    pub filename: String,
    /// Reference the save action points at
    pub url: String,
    pub media_type: String,
    pub data: Vec<u8>,
}
