//! Mock remover for testing and debugging
//!
//! Records every call and answers with a scripted outcome, so controller
//! logic can be exercised without a real model or external program.

use crate::{
    error::{IntakeError, Result},
    remover::BackgroundRemover,
    types::UploadCandidate,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Smallest valid PNG signature, used as the default mock output
pub const MOCK_PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Scripted outcome of a mock call
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Succeed with fixed bytes
    Succeed(Vec<u8>),
    /// Succeed by returning the input unchanged
    Echo,
    /// Fail with the given diagnostic
    Fail(String),
    /// Succeed with fixed bytes after a delay
    Delay(Duration, Vec<u8>),
    /// Never complete
    Hang,
}

/// Mock remover with call history
///
/// Clones share the call history, so a test can keep one clone for
/// assertions while the controller owns another.
#[derive(Debug, Clone)]
pub struct MockRemover {
    behavior: MockBehavior,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl MockRemover {
    /// Mock that succeeds with a PNG signature
    #[must_use]
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Succeed(MOCK_PNG_BYTES.to_vec()))
    }

    #[must_use]
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that fails every call
    pub fn new_failing<S: Into<String>>(diagnostic: S) -> Self {
        Self::with_behavior(MockBehavior::Fail(diagnostic.into()))
    }

    /// Mock whose calls never complete
    #[must_use]
    pub fn new_hanging() -> Self {
        Self::with_behavior(MockBehavior::Hang)
    }

    /// Names of the files passed in, in call order
    #[must_use]
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear_call_history(&self) {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for MockRemover {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackgroundRemover for MockRemover {
    async fn remove_background(&self, input: &UploadCandidate) -> Result<Vec<u8>> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.name().to_string());

        match &self.behavior {
            MockBehavior::Succeed(bytes) => Ok(bytes.clone()),
            MockBehavior::Echo => Ok(input.data().to_vec()),
            MockBehavior::Fail(diagnostic) => Err(IntakeError::processing(diagnostic.clone())),
            MockBehavior::Delay(delay, bytes) => {
                tokio::time::sleep(*delay).await;
                Ok(bytes.clone())
            },
            MockBehavior::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
