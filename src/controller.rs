//! Image intake and preview controller
//!
//! Owns the UI state machine for a single-image background-removal front end:
//!
//! ```text
//! Idle --(valid file)--> Processing --(success)--> Result --(reset)--> Idle
//!                        Processing --(failure)--> Error  --(upload|reset)--> Processing|Idle
//! ```
//!
//! The pipeline is strictly linear (validate, dispatch, await, render or
//! error) with a single suspension point: the call into the
//! [`BackgroundRemover`]. Preview references are [`ObjectUrl`] guards held
//! inside the state, so replacing the state is what releases them.

use crate::{
    config::IntakeConfig,
    error::{IntakeError, Result},
    object_url::{ObjectUrl, ObjectUrlStore},
    remover::BackgroundRemover,
    services::{ImageIoService, MediaFormatHandler, NoOpObserver, StateChange, StateObserver},
    state::{PendingUpload, UiState, UiStateKind},
    types::{DownloadArtifact, ProcessedResult, ProcessingMetadata, UploadCandidate},
    utils::UploadValidator,
};
use chrono::{DateTime, Utc};
use instant::Instant;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Media type recorded for processed output
const PROCESSED_MEDIA_TYPE: &str = "image/png";

/// Handle for an outstanding removal call
///
/// Returned by [`IntakeController::begin`] and redeemed with
/// [`IntakeController::on_complete`] or [`IntakeController::on_failure`].
/// A ticket issued before a reset is stale; redeeming it changes nothing.
#[derive(Debug)]
pub struct RemovalTicket {
    id: Uuid,
    candidate: UploadCandidate,
    started_at: DateTime<Utc>,
    timer: Instant,
}

impl RemovalTicket {
    /// The validated upload to hand to the remover
    #[must_use]
    pub fn candidate(&self) -> &UploadCandidate {
        &self.candidate
    }
}

/// Controller for image intake, background removal dispatch and previews
pub struct IntakeController {
    config: IntakeConfig,
    remover: Box<dyn BackgroundRemover>,
    store: ObjectUrlStore,
    observer: Arc<dyn StateObserver>,
    state: UiState,
    dragging: bool,
    selected_file: Option<String>,
}

impl IntakeController {
    /// Create a controller in the idle state
    ///
    /// # Errors
    /// - Invalid configuration
    pub fn new<R>(config: IntakeConfig, remover: R) -> Result<Self>
    where
        R: BackgroundRemover + 'static,
    {
        config.validate()?;

        Ok(Self {
            config,
            remover: Box::new(remover),
            store: ObjectUrlStore::new(),
            observer: Arc::new(NoOpObserver),
            state: UiState::Idle,
            dragging: false,
            selected_file: None,
        })
    }

    /// Attach an observer notified of every transition
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn StateObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Register references in an existing store instead of a private one
    #[must_use]
    pub fn with_store(mut self, store: ObjectUrlStore) -> Self {
        self.store = store;
        self
    }

    #[must_use]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &ObjectUrlStore {
        &self.store
    }

    /// Number of preview references currently live
    #[must_use]
    pub fn live_references(&self) -> usize {
        self.store.live_count()
    }

    /// Whether the drop overlay is shown
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging && self.drop_zone_visible()
    }

    /// Name held by the file input, if any
    #[must_use]
    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    /// Check a candidate without touching state
    ///
    /// # Errors
    /// - `InvalidType` when the media type is not an image
    /// - `TooLarge` when the file exceeds the size limit
    pub fn validate(&self, candidate: &UploadCandidate) -> Result<()> {
        UploadValidator::validate(candidate, &self.config)
    }

    /// Validate a candidate and enter the processing state
    ///
    /// Any previous result is released before the original preview is
    /// created. On validation failure the controller enters the error state
    /// and the same error is returned.
    ///
    /// # Errors
    /// - `Busy` while another removal is outstanding (state unchanged)
    /// - `InvalidType` / `TooLarge` from validation
    pub fn begin(&mut self, candidate: UploadCandidate) -> Result<RemovalTicket> {
        if !self.state.accepts_uploads() {
            warn!(file = %candidate.name(), "upload refused while processing");
            return Err(IntakeError::Busy);
        }

        self.selected_file = Some(candidate.name().to_string());
        self.set_dragging(false);

        if let Err(err) = self.validate(&candidate) {
            warn!(
                file = %candidate.name(),
                media_type = %candidate.media_type(),
                size = candidate.size(),
                error = %err,
                "upload rejected"
            );
            self.transition(UiState::Error(err.clone()));
            return Err(err);
        }

        let from = self.state.kind();
        // Drop the previous result before acquiring new references.
        self.state = UiState::Idle;

        let ticket = RemovalTicket {
            id: Uuid::new_v4(),
            candidate,
            started_at: Utc::now(),
            timer: Instant::now(),
        };
        let original = self
            .store
            .create(ticket.candidate.data().to_vec(), ticket.candidate.media_type());

        info!(
            file = %ticket.candidate.name(),
            bytes = ticket.candidate.size(),
            remover = %self.remover.name(),
            "dispatching upload"
        );

        self.state = UiState::Processing(PendingUpload {
            ticket_id: ticket.id,
            original,
            display_name: ticket.candidate.name().to_string(),
        });
        self.notify(from);

        Ok(ticket)
    }

    /// Wrap the remover's output and enter the result state
    pub fn on_complete(&mut self, ticket: RemovalTicket, result_bytes: Vec<u8>) {
        let Some(pending) = self.take_pending(&ticket) else {
            return;
        };

        let processed_size = result_bytes.len() as u64;
        let processed = self.store.create(result_bytes, PROCESSED_MEDIA_TYPE);
        let metadata = ProcessingMetadata {
            started_at: ticket.started_at,
            completed_at: Utc::now(),
            elapsed_ms: ticket.timer.elapsed().as_millis() as u64,
            original_size: ticket.candidate.size(),
            processed_size,
        };

        info!(
            file = %pending.display_name,
            elapsed_ms = metadata.elapsed_ms,
            processed_bytes = processed_size,
            "background removed"
        );

        let result = ProcessedResult::new(
            pending.original,
            processed,
            pending.display_name,
            metadata,
        );
        self.state = UiState::Result(result);
        self.notify(UiStateKind::Processing);
    }

    /// Enter the error state after a failed removal
    ///
    /// The diagnostic is logged; the state only carries the generic failure.
    pub fn on_failure(&mut self, ticket: RemovalTicket, error: IntakeError) {
        let Some(pending) = self.take_pending(&ticket) else {
            return;
        };

        error!(
            file = %pending.display_name,
            remover = %self.remover.name(),
            error = %error,
            "background removal failed"
        );

        drop(pending);
        let failure = match error {
            IntakeError::ProcessingFailure(msg) => IntakeError::ProcessingFailure(msg),
            other => IntakeError::processing(other.to_string()),
        };
        self.state = UiState::Error(failure);
        self.notify(UiStateKind::Processing);
    }

    /// Run the full pipeline for one file: validate, dispatch, await, settle
    ///
    /// # Errors
    /// - `Busy`, `InvalidType`, `TooLarge` as for [`begin`](Self::begin)
    /// - `ProcessingFailure` when the remover fails or times out
    #[instrument(skip_all, fields(file = %candidate.name()))]
    pub async fn dispatch(&mut self, candidate: UploadCandidate) -> Result<()> {
        let ticket = self.begin(candidate)?;

        let call = self.remover.remove_background(ticket.candidate());
        let outcome = match self.config.processing_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(IntakeError::processing(format!(
                    "Remover did not finish within {}s",
                    limit.as_secs()
                ))),
            },
            None => call.await,
        };

        match outcome {
            Ok(bytes) => {
                self.on_complete(ticket, bytes);
                Ok(())
            },
            Err(err) => {
                self.on_failure(ticket, err);
                match self.state.error() {
                    Some(failure) => Err(failure.clone()),
                    None => Ok(()),
                }
            },
        }
    }

    /// Return to idle from any state
    ///
    /// Releases the current result's references, clears the error and the
    /// file-input selection. A removal still outstanding is abandoned; its
    /// late completion is ignored.
    pub fn reset(&mut self) {
        self.selected_file = None;
        self.set_dragging(false);

        if self.state.is_idle() {
            return;
        }

        let from = self.state.kind();
        self.state = UiState::Idle;
        debug!(from = %from, live_references = self.store.live_count(), "reset");
        self.notify(from);
    }

    /// Close the error banner
    pub fn dismiss_error(&mut self) {
        if let UiState::Error(_) = self.state {
            self.state = UiState::Idle;
            self.notify(UiStateKind::Error);
        }
    }

    /// Build the save action for the current result
    ///
    /// # Errors
    /// - `NoResult` outside the result state
    pub fn download(&self) -> Result<DownloadArtifact> {
        let result = self.state.result().ok_or(IntakeError::NoResult)?;
        let processed: &ObjectUrl = result.processed();

        Ok(DownloadArtifact {
            filename: MediaFormatHandler::download_filename(result.display_name(), &self.config),
            url: processed.as_str().to_string(),
            media_type: processed.media_type().to_string(),
            data: processed.bytes().to_vec(),
        })
    }

    /// Save the current result into `dir`, returning the written path
    ///
    /// # Errors
    /// - `NoResult` outside the result state
    /// - I/O failures while writing
    pub async fn download_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let artifact = self.download()?;
        ImageIoService::save_download(&artifact, dir).await
    }

    /// Pointer entered the drop zone
    pub fn drag_enter(&mut self) {
        if self.drop_zone_visible() {
            self.set_dragging(true);
        }
    }

    /// Pointer moving over the drop zone
    pub fn drag_over(&mut self) {
        self.drag_enter();
    }

    /// Pointer left the drop zone
    pub fn drag_leave(&mut self) {
        self.set_dragging(false);
    }

    /// Files dropped: clear the overlay and dispatch the first file
    ///
    /// An empty drop only clears the overlay.
    ///
    /// # Errors
    /// As for [`dispatch`](Self::dispatch)
    pub async fn drop_files(&mut self, files: Vec<UploadCandidate>) -> Result<()> {
        self.set_dragging(false);

        let Some(first) = files.into_iter().next() else {
            debug!("drop without files ignored");
            return Ok(());
        };
        self.dispatch(first).await
    }

    fn drop_zone_visible(&self) -> bool {
        matches!(self.state, UiState::Idle | UiState::Error(_))
    }

    fn take_pending(&mut self, ticket: &RemovalTicket) -> Option<PendingUpload> {
        match &self.state {
            UiState::Processing(pending) if pending.ticket_id == ticket.id => {},
            _ => {
                debug!(file = %ticket.candidate.name(), "stale removal outcome ignored");
                return None;
            },
        }

        match std::mem::take(&mut self.state) {
            UiState::Processing(pending) => Some(pending),
            _ => None,
        }
    }

    fn transition(&mut self, next: UiState) {
        let from = self.state.kind();
        self.state = next;
        self.notify(from);
    }

    fn set_dragging(&mut self, dragging: bool) {
        if self.dragging != dragging {
            self.dragging = dragging;
            self.observer.on_drag_change(dragging);
        }
    }

    fn notify(&self, from: UiStateKind) {
        let mut change = StateChange::new(from, self.state.kind());

        let display_name = match &self.state {
            UiState::Processing(pending) => Some(pending.display_name()),
            UiState::Result(result) => Some(result.display_name()),
            UiState::Error(_) | UiState::Idle => self.selected_file.as_deref(),
        };
        if let Some(name) = display_name {
            change = change.with_display_name(name);
        }
        if let Some(message) = self.state.error_message() {
            change = change.with_message(message);
        }

        self.observer.on_state_change(&change);
    }
}

impl std::fmt::Debug for IntakeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeController")
            .field("state", &self.state)
            .field("dragging", &self.dragging)
            .field("selected_file", &self.selected_file)
            .field("remover", &self.remover.name())
            .finish_non_exhaustive()
    }
}
