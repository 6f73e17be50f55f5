//! Command: convert cloud-config and print the resulting commands.
use std::fmt::Write as _;

use anyhow::{Context as _, Result, bail};

use crate::cli::{ConvertOpts, OutputFormat};
use crate::command::{Cmd, shell_quote};
use crate::convert::convert;
use crate::logging;

/// Run the `convert` subcommand.
///
/// On a partial conversion the commands generated before the failure are
/// still printed, then the error is returned.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the conversion fails, or
/// the output cannot be written.
pub fn run(opts: &ConvertOpts) -> Result<()> {
    let raw = super::read_input(&opts.input)?;
    tracing::info!(target: logging::STAGE, "Converting {}", opts.input.input.display());

    let (commands, failure) = match convert(&raw) {
        Ok(commands) => (commands, None),
        Err(partial) => (partial.commands, Some(partial.source)),
    };
    tracing::debug!("{} command(s) generated", commands.len());

    super::emit(&render(&commands, opts.format)?)?;

    match failure {
        Some(e) => {
            if !commands.is_empty() {
                tracing::warn!("output is incomplete: only {} command(s) before the error", commands.len());
            }
            Err(e).context("cloud-config conversion failed")
        }
        None => Ok(()),
    }
}

/// Render `commands` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails, or if a command holds a NUL
/// byte and `format` is [`OutputFormat::Script`].
pub fn render(commands: &[Cmd], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(commands)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(commands).context("serializing commands")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Script => render_script(commands),
    }
}

fn render_text(commands: &[Cmd]) -> String {
    let mut out = String::new();
    for cmd in commands {
        let _ = writeln!(out, "{cmd}");
        if let Some(stdin) = &cmd.stdin {
            let _ = writeln!(out, "    (stdin: {} bytes)", stdin.len());
        }
    }
    out
}

/// Shell words cannot carry NUL, so such commands are refused.
fn render_script(commands: &[Cmd]) -> Result<String> {
    let mut out = String::from("#!/bin/sh\nset -e\n");
    for cmd in commands {
        let has_nul = std::iter::once(&cmd.program)
            .chain(&cmd.args)
            .chain(&cmd.stdin)
            .any(|word| word.contains('\0'));
        if has_nul {
            bail!("'{cmd}' contains a NUL byte and cannot be rendered as a script; use --format json");
        }
        match &cmd.stdin {
            Some(stdin) => {
                let _ = writeln!(out, "printf '%s' {} | {cmd}", shell_quote(stdin));
            }
            None => {
                let _ = writeln!(out, "{cmd}");
            }
        }
    }
    Ok(out)
}
