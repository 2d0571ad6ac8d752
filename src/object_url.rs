//! Revocable references to in-memory image data
//!
//! An [`ObjectUrl`] is the Rust counterpart of a browser object URL: a string
//! handle that resolves to a blob until it is revoked. Handles are scoped
//! resources; dropping one revokes it, so every state transition that discards
//! a handle also releases the underlying memory.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;
use uuid::Uuid;

const URL_SCHEME: &str = "blob:bgremove-studio/";

#[derive(Debug)]
struct BlobEntry {
    data: Arc<[u8]>,
    media_type: String,
}

/// Registry of live object URLs
///
/// Cloning the store is cheap and yields another view of the same registry.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrlStore {
    entries: Arc<Mutex<HashMap<String, BlobEntry>>>,
}

impl ObjectUrlStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, BlobEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `data` and return an owning handle to it
    pub fn create<S: Into<String>>(&self, data: Vec<u8>, media_type: S) -> ObjectUrl {
        let url = format!("{}{}", URL_SCHEME, Uuid::new_v4());
        let data: Arc<[u8]> = data.into();
        let media_type = media_type.into();

        self.lock().insert(
            url.clone(),
            BlobEntry {
                data: Arc::clone(&data),
                media_type: media_type.clone(),
            },
        );
        trace!(url = %url, bytes = data.len(), "object url created");

        ObjectUrl {
            url,
            media_type,
            data,
            store: self.clone(),
        }
    }

    /// Look up the bytes behind a URL; `None` once it has been revoked
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.lock().get(url).map(|entry| Arc::clone(&entry.data))
    }

    /// Media type recorded for a live URL
    #[must_use]
    pub fn media_type(&self, url: &str) -> Option<String> {
        self.lock().get(url).map(|entry| entry.media_type.clone())
    }

    /// Whether the URL is still live
    #[must_use]
    pub fn is_live(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    /// Number of URLs that have not been revoked
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    /// Total bytes held by live URLs
    #[must_use]
    pub fn live_bytes(&self) -> usize {
        self.lock().values().map(|entry| entry.data.len()).sum()
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url).is_some() {
            trace!(url = %url, "object url revoked");
        }
    }
}

/// Owning handle to a registered blob; revoked on drop
pub struct ObjectUrl {
    url: String,
    media_type: String,
    data: Arc<[u8]>,
    store: ObjectUrlStore,
}

impl ObjectUrl {
    /// The `blob:` URL string a renderer can point at
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Revoke the handle now instead of at end of scope
    pub fn revoke(self) {
        drop(self);
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrl")
            .field("url", &self.url)
            .field("media_type", &self.media_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
