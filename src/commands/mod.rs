//! Subcommand implementations.
pub mod convert;
pub mod run;
pub mod validate;
pub mod version;

use std::io::{Read as _, Write as _};
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::InputOpts;

/// Read the raw cloud-config payload selected by `opts`.
///
/// # Errors
///
/// Returns an error if the file (or stdin) cannot be read.
pub fn read_input(opts: &InputOpts) -> Result<Vec<u8>> {
    if opts.input == Path::new("-") {
        let mut raw = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut raw)
            .context("reading cloud-config from stdin")?;
        return Ok(raw);
    }
    std::fs::read(&opts.input)
        .with_context(|| format!("reading cloud-config {}", opts.input.display()))
}

/// Write rendered output to stdout.
///
/// # Errors
///
/// Returns an error if stdout is closed.
pub fn emit(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("writing to stdout")
}
