//! Domain-specific error types for the cloud-config converter.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors while subcommand handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! PartialConversion          : commands produced so far + the failure
//! └── ConvertError
//!     ├── Syntax(SyntaxError)             : payload is not a YAML mapping
//!     ├── Decode(DecodeError)             : a module has an unsupported shape
//!     └── ContentDecode { path, source }  : write_files content could not be decoded
//! ExecError                  : local execution of a generated command
//! ```

use thiserror::Error;

use crate::command::Cmd;

/// Any failure that stops a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The payload is not a well-formed structured document.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A module or command has a shape the parser does not accept.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A `write_files` entry declared an encoding that could not be applied.
    #[error("error decoding content for {path}: {source}")]
    ContentDecode {
        /// Path of the file whose content failed to decode.
        path: String,
        /// Underlying decoding failure.
        source: ContentDecodeError,
    },
}

/// The raw payload did not parse as a YAML mapping.
#[derive(Error, Debug)]
#[error("cloud-config is not valid yaml: {0}")]
pub struct SyntaxError(#[from] pub serde_yaml::Error);

/// A module block or one of its nodes has a shape this parser does not accept.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The block text could not be parsed into the module's structure.
    #[error("error parsing {module} module: {source}")]
    Block {
        /// Module whose block failed to parse.
        module: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A node has the wrong shape (e.g. a mapping where a command was expected).
    #[error("error parsing {module} module: expected {expected}, found {node}")]
    UnexpectedShape {
        /// Module containing the offending node.
        module: String,
        /// Human-readable description of the accepted shapes.
        expected: &'static str,
        /// Rendering of the offending node.
        node: String,
    },

    /// A list-form command with no elements.
    #[error("error parsing {module} module: command list is empty")]
    EmptyCommand {
        /// Module containing the empty command.
        module: String,
    },
}

/// A declared content encoding could not be applied.
#[derive(Error, Debug)]
pub enum ContentDecodeError {
    /// The content is not valid base64.
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The content is not a valid (or is a truncated) gzip stream.
    #[error("invalid gzip content: {0}")]
    Gzip(#[source] std::io::Error),

    /// The decoded bytes are not UTF-8 and cannot be fed as text on stdin.
    #[error("decoded content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A conversion that stopped early.
///
/// Carries every command generated before the failure point so the caller can
/// decide whether the prefix is safe to execute.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct PartialConversion {
    /// Commands generated before the failure, in order.
    pub commands: Vec<Cmd>,
    /// The failure that stopped the conversion.
    #[source]
    pub source: ConvertError,
}

impl PartialConversion {
    /// Wrap `source` with the commands produced so far.
    #[must_use]
    pub const fn new(commands: Vec<Cmd>, source: ConvertError) -> Self {
        Self { commands, source }
    }
}

/// Errors that arise while running a generated command locally.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The process could not be started or its stdin could not be written.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that could not be started.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("{program} failed (exit {code}): {stderr}")]
    Failed {
        /// Program that failed.
        program: String,
        /// Exit code, or `-1` when terminated by a signal.
        code: i32,
        /// Trimmed standard error output.
        stderr: String,
    },
}
