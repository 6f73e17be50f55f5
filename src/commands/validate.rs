//! Command: check a cloud-config payload and list its modules in order.
use std::fmt::Write as _;

use anyhow::{Context as _, Result};

use crate::actions::{ActionKind, resolve};
use crate::cli::InputOpts;
use crate::cloud_config::{self, Block};
use crate::logging;

/// Run the `validate` subcommand.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not well-formed.
pub fn run(opts: &InputOpts) -> Result<()> {
    let raw = super::read_input(opts)?;
    tracing::info!(target: logging::STAGE, "Validating {}", opts.input.display());

    cloud_config::validate(&raw).context("cloud-config validation failed")?;
    let blocks = cloud_config::split(&raw);
    tracing::info!("{} module(s) found", blocks.len());

    super::emit(&summarize(&blocks))
}

/// One line per module, in source order, marking the ones that are ignored.
#[must_use]
pub fn summarize(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        let status = match resolve(&block.key) {
            ActionKind::WriteFiles | ActionKind::RunCmd => "converted",
            ActionKind::Unknown(_) => "ignored",
        };
        let _ = writeln!(out, "{:<24} {status}", block.key);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_marks_unknown_modules() {
        let blocks = cloud_config::split(b"#cloud-config\nhostname: node-1\nwrite_files: []\nruncmd: []\n");
        insta::assert_snapshot!(summarize(&blocks), @r"
        hostname                 ignored
        write_files              converted
        runcmd                   converted
        ");
    }
}
