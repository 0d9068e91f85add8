//! CLI interface for gitorial: command parsing, config resolution and the
//! async entrypoint used by both `main()` and integration tests.
//!
//! All extraction logic lives in the `gitorial-core` crate. This module only
//! maps arguments onto an [`ExtractConfig`](gitorial_core::ExtractConfig) and
//! hands results to [`crate::output`].

use crate::load_config::{default_config, load_config, CliConfig, Overrides};
use crate::output::{render_outline, write_course};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI for gitorial: turn a tagged tutorial repository into a course.
#[derive(Parser)]
#[clap(
    name = "gitorial",
    version,
    about = "Extract sections and lessons from a gitorial commit history or steps layout"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the course and write it as JSON
    Extract {
        #[clap(flatten)]
        source: SourceArgs,
        /// Write JSON here instead of stdout
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Print the course outline without reading any file contents
    Inspect {
        #[clap(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to a YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Local path or git URL of the tutorial repository
    #[clap(long)]
    pub source: Option<String>,
    /// Branch holding the tagged history
    #[clap(long)]
    pub branch: Option<String>,
    /// Read the numbered steps layout instead of the commit history
    #[clap(long)]
    pub steps: bool,
}

fn resolve_config(args: SourceArgs, output: Option<PathBuf>) -> Result<CliConfig> {
    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    Ok(base.with_overrides(Overrides {
        source: args.source,
        branch: args.branch,
        steps: args.steps,
        output,
    }))
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let result = match cli.command {
        Commands::Extract { source, output } => {
            let config = resolve_config(source, output)?;
            let extract_config = config.extract_config()?;
            tracing::info!(command = "extract", source = %extract_config.source, "Starting extraction");
            let extraction =
                tokio::task::spawn_blocking(move || gitorial_core::extract(&extract_config))
                    .await
                    .map_err(|e| anyhow::anyhow!("Extraction task panicked: {e}"))?;
            match extraction {
                Ok(extraction) => {
                    write_course(&extraction, config.output.path.as_deref(), config.output.pretty)?;
                    for warning in &extraction.warnings {
                        eprintln!("[WARN] {warning}");
                    }
                    eprintln!(
                        "Extraction complete: {} sections, {} lessons ({:?} mode)",
                        extraction.data.sections.len(),
                        extraction.data.lesson_count(),
                        extraction.mode
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "extract", error = %e, "Extraction failed");
                    eprintln!("[ERROR] Extraction failed: {e}");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::Inspect { source } => {
            let config = resolve_config(source, None)?;
            let extract_config = config.extract_config()?;
            tracing::info!(command = "inspect", source = %extract_config.source, "Planning course");
            let plan = tokio::task::spawn_blocking(move || gitorial_core::inspect(&extract_config))
                .await
                .map_err(|e| anyhow::anyhow!("Inspection task panicked: {e}"))?;
            match plan {
                Ok(plan) => {
                    print!("{}", render_outline(&plan));
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "inspect", error = %e, "Inspection failed");
                    eprintln!("[ERROR] Inspection failed: {e}");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    };

    // Emit an 'exit' span so the end of a run is visible in structured traces.
    let exit_span = tracing::info_span!("exit");
    exit_span.in_scope(|| {
        tracing::info!(success = result.is_ok(), "exit");
    });

    result
}
