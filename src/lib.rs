#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Background Removal Studio
//!
//! Image intake and before/after preview controller for background-removal
//! front ends.
//!
//! The crate holds everything a single-image "drop a photo, get a cut-out"
//! interface needs except the model itself: upload validation, the UI state
//! machine, revocable preview references and download naming. The actual
//! background removal is an opaque capability behind the
//! [`BackgroundRemover`] trait.
//!
//! ## Features
//!
//! - **Single state enum**: `Idle`, `Processing`, `Result`, `Error`; illegal
//!   combinations cannot be represented
//! - **Scoped previews**: [`ObjectUrl`] handles are revoked when dropped, so
//!   superseded results never leak
//! - **Pluggable remover**: [`CommandRemover`] pipes images through an external
//!   program, [`MockRemover`] scripts outcomes for tests
//! - **CLI Integration**: Optional command-line front end (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bgremove_studio::{CommandRemover, ImageIoService, IntakeConfig, IntakeController};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut controller = IntakeController::new(IntakeConfig::default(), CommandRemover::default())?;
//!
//! let candidate = ImageIoService::load_candidate("cat.jpg").await?;
//! match controller.dispatch(candidate).await {
//!     Ok(()) => {
//!         let saved = controller.download_to(ImageIoService::default_download_dir()).await?;
//!         println!("Saved {}", saved.display());
//!     },
//!     Err(err) => eprintln!("{}", err.user_message()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! bgremove-studio = { version = "0.1", default-features = false }
//! ```

pub mod backends;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod object_url;
pub mod remover;
pub mod services;
pub mod state;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod utils;

// Public API exports
pub use backends::*;
pub use config::{IntakeConfig, IntakeConfigBuilder, DEFAULT_MAX_FILE_SIZE};
pub use controller::{IntakeController, RemovalTicket};
pub use error::{IntakeError, Result};
pub use object_url::{ObjectUrl, ObjectUrlStore};
pub use remover::BackgroundRemover;
pub use services::{
    ImageIoService, MediaFormatHandler, NoOpObserver, RecordingObserver, StateChange,
    StateObserver, TracingObserver,
};
pub use state::{PendingUpload, UiState, UiStateKind};
pub use types::{DownloadArtifact, ProcessedResult, ProcessingMetadata, UploadCandidate};
pub use utils::UploadValidator;

#[cfg(feature = "cli")]
pub use tracing_config::{TracingConfig, TracingFormat};
