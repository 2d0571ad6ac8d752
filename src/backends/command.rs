//! Remover backed by an external program
//!
//! The image is written to the program's stdin and the processed image is read
//! from its stdout. The default invocation targets the `imgly-bgremove` CLI in
//! stdin/stdout mode.

use crate::{
    error::{IntakeError, Result},
    remover::BackgroundRemover,
    types::UploadCandidate,
};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Default program invoked by [`CommandRemover::default`]
pub const DEFAULT_REMOVER_PROGRAM: &str = "imgly-bgremove";

/// Default arguments: read stdin, write PNG to stdout
pub const DEFAULT_REMOVER_ARGS: [&str; 3] = ["-", "--output", "-"];

/// Pipes images through an external background-removal command
#[derive(Debug, Clone)]
pub struct CommandRemover {
    program: String,
    args: Vec<String>,
}

impl CommandRemover {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for CommandRemover {
    fn default() -> Self {
        Self::new(DEFAULT_REMOVER_PROGRAM, DEFAULT_REMOVER_ARGS)
    }
}

#[async_trait]
impl BackgroundRemover for CommandRemover {
    #[instrument(skip(self, input), fields(program = %self.program, file = %input.name()))]
    async fn remove_background(&self, input: &UploadCandidate) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                IntakeError::processing(format!("Failed to start '{}': {}", self.program, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| IntakeError::processing("Remover stdin was not captured"))?;

        // stdin is fed while stdout drains; a full pipe would otherwise block both sides.
        let data = input.data().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&data).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await.map_err(|e| {
            IntakeError::processing(format!("Failed to wait for '{}': {}", self.program, e))
        })?;

        let write_result = writer
            .await
            .map_err(|e| IntakeError::processing(format!("Remover input task failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IntakeError::processing(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        write_result.map_err(|e| {
            IntakeError::processing(format!("Failed to send image to '{}': {}", self.program, e))
        })?;

        if output.stdout.is_empty() {
            return Err(IntakeError::processing(format!(
                "'{}' produced no output",
                self.program
            )));
        }

        debug!(bytes = output.stdout.len(), "remover produced output");
        Ok(output.stdout)
    }

    fn name(&self) -> &str {
        &self.program
    }
}
