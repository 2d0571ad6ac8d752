//! Background-removal capability abstraction
//!
//! The controller never runs a model itself. It hands the uploaded bytes to a
//! [`BackgroundRemover`] and treats it as an opaque asynchronous function:
//! image bytes in, image bytes out, or failure.

use crate::{error::Result, types::UploadCandidate};
use async_trait::async_trait;

/// Trait for external background-removal capabilities
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background from an uploaded image
    ///
    /// # Errors
    /// Any failure of the underlying capability. The controller maps every
    /// error to the generic processing failure state.
    async fn remove_background(&self, input: &UploadCandidate) -> Result<Vec<u8>>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "remover"
    }
}

#[async_trait]
impl<T: BackgroundRemover + ?Sized> BackgroundRemover for Box<T> {
    async fn remove_background(&self, input: &UploadCandidate) -> Result<Vec<u8>> {
        (**self).remove_background(input).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: BackgroundRemover + ?Sized> BackgroundRemover for std::sync::Arc<T> {
    async fn remove_background(&self, input: &UploadCandidate) -> Result<Vec<u8>> {
        (**self).remove_background(input).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
