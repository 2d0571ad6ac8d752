//! UI state of the intake controller

use crate::error::IntakeError;
use crate::object_url::ObjectUrl;
use crate::types::ProcessedResult;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

/// Upload in flight: the original preview is live while the remover runs
#[derive(Debug)]
pub struct PendingUpload {
    pub(crate) ticket_id: Uuid,
    pub(crate) original: ObjectUrl,
    pub(crate) display_name: String,
}

impl PendingUpload {
    #[must_use]
    pub fn original(&self) -> &ObjectUrl {
        &self.original
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Mutually exclusive UI states
///
/// Dragging is not a state: it is an overlay flag kept by the controller.
#[derive(Debug, Default)]
pub enum UiState {
    /// Upload area shown, waiting for a file
    #[default]
    Idle,
    /// Removal call outstanding; uploads are refused
    Processing(PendingUpload),
    /// Before/after previews with a download action
    Result(ProcessedResult),
    /// Dismissible banner; a new upload or reset leaves this state
    Error(IntakeError),
}

impl UiState {
    #[must_use]
    pub fn kind(&self) -> UiStateKind {
        match self {
            Self::Idle => UiStateKind::Idle,
            Self::Processing(_) => UiStateKind::Processing,
            Self::Result(_) => UiStateKind::Result,
            Self::Error(_) => UiStateKind::Error,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing(_))
    }

    #[must_use]
    pub fn result(&self) -> Option<&ProcessedResult> {
        match self {
            Self::Result(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&IntakeError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Banner text for the error state
    #[must_use]
    pub fn error_message(&self) -> Option<Cow<'static, str>> {
        self.error().map(IntakeError::user_message)
    }

    /// Whether a new file may be dispatched from this state
    #[must_use]
    pub fn accepts_uploads(&self) -> bool {
        !self.is_processing()
    }
}

/// Discriminant of [`UiState`], for observers and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiStateKind {
    Idle,
    Processing,
    Result,
    Error,
}

impl fmt::Display for UiStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Result => write!(f, "result"),
            Self::Error => write!(f, "error"),
        }
    }
}
