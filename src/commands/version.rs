//! Command: print version information.
use anyhow::Result;

/// Version string baked in by `build.rs`, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("CLOUDCMD_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the cloudcmd version to stdout.
///
/// # Errors
///
/// Returns an error if stdout is closed.
pub fn run() -> Result<()> {
    super::emit(&format!("cloudcmd {}\n", version()))
}
