//! Command: convert cloud-config and execute the commands locally.
use anyhow::{Context as _, Result, bail};

use crate::cli::RunOpts;
use crate::convert::convert;
use crate::exec::{Executor, SystemExecutor};
use crate::logging;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands that ran successfully.
    pub succeeded: usize,
    /// Commands that failed (only possible with `--keep-going`).
    pub failed: usize,
    /// Commands only logged because of `--dry-run`.
    pub previewed: usize,
}

/// Run the `run` subcommand against the local machine.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the conversion fails, or a
/// command fails.
pub fn run(opts: &RunOpts) -> Result<()> {
    let raw = super::read_input(&opts.input)?;
    tracing::info!(target: logging::STAGE, "Converting {}", opts.input.input.display());
    run_with(&raw, opts, &SystemExecutor).map(|_| ())
}

/// Convert `raw` and execute the commands in order through `executor`.
///
/// Fail-fast by default. With `keep_going`, failing commands are counted and
/// skipped, and the prefix of a partial conversion is executed; the run still
/// ends in an error afterwards.
///
/// # Errors
///
/// Returns an error if the conversion fails (before anything runs, unless
/// `keep_going`), or if any command fails.
pub fn run_with(raw: &[u8], opts: &RunOpts, executor: &dyn Executor) -> Result<RunSummary> {
    let (commands, failure) = match convert(raw) {
        Ok(commands) => (commands, None),
        Err(partial) => (partial.commands, Some(partial.source)),
    };

    let failure = match failure {
        Some(e) if !opts.keep_going || commands.is_empty() => {
            return Err(e).context("cloud-config conversion failed; nothing was executed");
        }
        Some(e) => {
            tracing::warn!(
                "conversion stopped early ({e}); executing the {} command(s) generated before it",
                commands.len()
            );
            Some(e)
        }
        None => None,
    };

    let total = commands.len();
    tracing::info!(target: logging::STAGE, "Executing {total} command(s)");

    let mut summary = RunSummary::default();
    for (index, cmd) in commands.iter().enumerate() {
        let step = index + 1;
        if opts.dry_run {
            tracing::info!(target: logging::DRY_RUN, "[{step}/{total}] would run: {cmd}");
            summary.previewed += 1;
            continue;
        }

        tracing::info!("[{step}/{total}] {cmd}");
        match executor.run_cmd(cmd) {
            Ok(result) => {
                if !result.stdout.trim().is_empty() {
                    tracing::debug!("{}", result.stdout.trim_end());
                }
                summary.succeeded += 1;
            }
            Err(e) if opts.keep_going => {
                tracing::warn!("[{step}/{total}] {e}");
                summary.failed += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("command {step} of {total} failed: {cmd}"));
            }
        }
    }

    tracing::info!(
        "{} succeeded, {} failed, {} previewed",
        summary.succeeded,
        summary.failed,
        summary.previewed
    );

    if let Some(e) = failure {
        return Err(e).context("cloud-config conversion was incomplete");
    }
    if summary.failed > 0 {
        bail!("{} command(s) failed", summary.failed);
    }
    Ok(summary)
}
