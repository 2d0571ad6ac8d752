//! Configuration conversion utilities for CLI arguments

use crate::backends::command::{CommandRemover, DEFAULT_REMOVER_ARGS};
use crate::cli::main_impl::Cli;
use crate::config::IntakeConfig;
use anyhow::{Context, Result};

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Convert CLI arguments to library configuration
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Reject argument combinations clap cannot express
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.remover_cmd.trim().is_empty() {
            anyhow::bail!("--remover-cmd must not be empty");
        }
        if cli.max_size_mb == Some(0) {
            anyhow::bail!("--max-size-mb must be at least 1");
        }
        if cli.timeout_secs == Some(0) {
            anyhow::bail!("--timeout-secs must be at least 1");
        }
        Ok(())
    }

    /// Build `IntakeConfig` from an optional JSON file plus flag overrides
    pub(crate) fn from_cli(cli: &Cli) -> Result<IntakeConfig> {
        let mut config = match &cli.config {
            Some(path) => IntakeConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => IntakeConfig::default(),
        };

        if let Some(mib) = cli.max_size_mb {
            config.max_file_size = mib
                .checked_mul(BYTES_PER_MIB)
                .context("--max-size-mb is too large")?;
        }
        if let Some(secs) = cli.timeout_secs {
            config.processing_timeout_secs = Some(secs);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Remover invocation from `--remover-cmd` / `--remover-arg`
    pub(crate) fn remover_from_cli(cli: &Cli) -> CommandRemover {
        if cli.remover_arg.is_empty() {
            CommandRemover::new(cli.remover_cmd.clone(), DEFAULT_REMOVER_ARGS)
        } else {
            CommandRemover::new(cli.remover_cmd.clone(), cli.remover_arg.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bgremove-studio").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["cat.jpg"]);
        CliConfigBuilder::validate_cli(&cli).unwrap();
        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config, IntakeConfig::default());

        let remover = CliConfigBuilder::remover_from_cli(&cli);
        assert_eq!(remover.program(), "imgly-bgremove");
        assert_eq!(remover.args(), &["-", "--output", "-"]);
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "cat.jpg",
            "--max-size-mb",
            "25",
            "--timeout-secs",
            "90",
            "--remover-cmd",
            "rembg",
            "--remover-arg",
            "i",
            "--remover-arg",
            "-",
        ]);
        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config.max_file_size, 25 * 1024 * 1024);
        assert_eq!(config.processing_timeout_secs, Some(90));

        let remover = CliConfigBuilder::remover_from_cli(&cli);
        assert_eq!(remover.program(), "rembg");
        assert_eq!(remover.args(), &["i", "-"]);
    }

    #[test]
    fn test_invalid_values() {
        assert!(CliConfigBuilder::validate_cli(&parse(&["cat.jpg", "--max-size-mb", "0"])).is_err());
        assert!(CliConfigBuilder::validate_cli(&parse(&["cat.jpg", "--timeout-secs", "0"])).is_err());
        assert!(CliConfigBuilder::validate_cli(&parse(&["cat.jpg", "--remover-cmd", " "])).is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.json");
        std::fs::write(&path, r#"{ "download_prefix": "cutout-", "max_file_size": 1024 }"#).unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let cli = parse(&["cat.jpg", "--config", &path_arg, "--max-size-mb", "2"]);
        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config.download_prefix, "cutout-");
        assert_eq!(config.max_file_size, 2 * 1024 * 1024);
    }
}
