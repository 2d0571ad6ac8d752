//! Upload validation
//!
//! Checks a candidate against the configured media type prefix and size
//! limit before anything is dispatched.

use crate::config::IntakeConfig;
use crate::error::{IntakeError, Result};
use crate::types::UploadCandidate;

/// Validator for user-supplied uploads
pub struct UploadValidator;

impl UploadValidator {
    /// Validate a candidate; type is checked before size
    ///
    /// # Errors
    /// - `InvalidType` when the media type lacks the accepted prefix
    /// - `TooLarge` when the size exceeds `max_file_size`
    pub fn validate(candidate: &UploadCandidate, config: &IntakeConfig) -> Result<()> {
        Self::validate_media_type(candidate.media_type(), &config.accepted_type_prefix)?;
        Self::validate_size(candidate.size(), config.max_file_size)
    }

    /// Media type must start with `prefix`, compared case-insensitively
    pub fn validate_media_type(media_type: &str, prefix: &str) -> Result<()> {
        let matches = media_type
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));

        if matches {
            Ok(())
        } else {
            Err(IntakeError::invalid_type(media_type))
        }
    }

    /// Size limit is inclusive
    pub fn validate_size(size: u64, limit: u64) -> Result<()> {
        if size > limit {
            return Err(IntakeError::too_large(size, limit));
        }
        Ok(())
    }
}
