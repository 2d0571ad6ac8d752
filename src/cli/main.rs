//! Background Removal Studio CLI
//!
//! Drives the intake controller for a single picked file: validate, hand it
//! to the external remover, then save the download.

use super::config::CliConfigBuilder;
use crate::{
    backends::CommandRemover,
    config::IntakeConfig,
    controller::IntakeController,
    services::{ImageIoService, StateChange, StateObserver},
    state::UiStateKind,
    types::UploadCandidate,
    tracing_config::{spans, TracingConfig, TracingFormat},
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Instrument};

/// Background removal intake CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-studio")]
pub struct Cli {
    /// Image file to upload
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory the processed image is saved to [default: system Downloads folder]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// External background-removal program
    #[arg(long, default_value = "imgly-bgremove")]
    pub remover_cmd: String,

    /// Argument passed to the remover (repeatable) [default: - --output -]
    #[arg(long, value_name = "ARG", allow_hyphen_values = true)]
    pub remover_arg: Vec<String>,

    /// Give up on the remover after this many seconds [default: wait indefinitely]
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Largest accepted upload in MiB [default: 10]
    #[arg(long, value_name = "MIB")]
    pub max_size_mb: Option<u64>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Declare the media type instead of deriving it from the file
    #[arg(long, value_name = "TYPE")]
    pub media_type: Option<String>,

    /// Plain log output without colors
    #[arg(long)]
    pub compact_logs: bool,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Terminal spinner shown while the remover runs
struct SpinnerObserver {
    spinner: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
            spinner.set_style(style);
        }
        Self { spinner }
    }
}

impl StateObserver for SpinnerObserver {
    fn on_state_change(&self, change: &StateChange) {
        match change.to {
            UiStateKind::Processing => {
                let name = change.display_name.as_deref().unwrap_or("image");
                self.spinner
                    .set_message(format!("Removing background from {}", name));
                self.spinner.enable_steady_tick(Duration::from_millis(100));
            },
            UiStateKind::Result | UiStateKind::Error | UiStateKind::Idle => {
                self.spinner.finish_and_clear();
            },
        }
    }
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    let session_id = uuid::Uuid::new_v4().to_string();
    init_tracing(&cli, &session_id).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;
    let remover = CliConfigBuilder::remover_from_cli(&cli);

    let session = spans::session(&session_id, remover.program());
    run(cli, config, remover).instrument(session).await
}

async fn run(cli: Cli, config: IntakeConfig, remover: CommandRemover) -> Result<()> {
    info!(
        input = %cli.input.display(),
        remover = %remover.program(),
        max_file_size = config.max_file_size,
        "Starting background removal"
    );

    let mut controller = IntakeController::new(config, remover)
        .context("Failed to create intake controller")?
        .with_observer(Arc::new(SpinnerObserver::new()));

    let mut candidate = ImageIoService::load_candidate(&cli.input)
        .instrument(spans::intake(&cli.input))
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    if let Some(media_type) = &cli.media_type {
        debug!(declared = %media_type, detected = %candidate.media_type(), "media type overridden");
        candidate = UploadCandidate::new(
            candidate.name().to_string(),
            media_type.clone(),
            candidate.into_data(),
        );
    }

    if let Err(err) = controller.dispatch(candidate).await {
        // Only the banner text reaches the user; details were logged.
        anyhow::bail!("{}", err.user_message());
    }

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(ImageIoService::default_download_dir);
    let saved = controller
        .download_to(&output_dir)
        .await
        .context("Failed to save the processed image")?;

    if let Some(result) = controller.state().result() {
        info!(
            elapsed_ms = result.metadata().elapsed_ms,
            original_bytes = result.metadata().original_size,
            processed_bytes = result.metadata().processed_size,
            "Processing complete"
        );
    }
    println!("✅ Saved {}", saved.display());

    controller.reset();
    Ok(())
}

/// Initialize tracing based on verbosity level
fn init_tracing(cli: &Cli, session_id: &str) -> Result<()> {
    let format = if cli.compact_logs {
        TracingFormat::Compact
    } else {
        TracingFormat::Console
    };

    TracingConfig::new()
        .with_verbosity(cli.verbose)
        .with_format(format)
        .with_session_id(session_id)
        .init()
        .context("Failed to initialize tracing subscriber")
}
