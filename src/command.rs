//! The normalized command model and its two accepted wire shapes.
use std::fmt;

use serde::Serialize;
use serde_yaml::Value;

use crate::error::DecodeError;

/// Program used to interpret string-form commands.
pub const SHELL: &str = "/bin/sh";

/// One executable step destined for the provisioned node.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::command::Cmd;
///
/// let cmd = Cmd::new("systemctl", vec!["restart".into(), "foo".into()]);
/// assert_eq!(cmd.to_string(), "systemctl restart foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cmd {
    /// Program to execute.
    pub program: String,
    /// Arguments passed verbatim, without shell interpretation.
    pub args: Vec<String>,
    /// Text fed to the process on standard input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
}

impl Cmd {
    /// Create a command without standard input.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            stdin: None,
        }
    }

    /// Create a `/bin/sh -c <line>` command.
    #[must_use]
    pub fn shell(line: impl Into<String>) -> Self {
        Self::new(SHELL, vec!["-c".to_string(), line.into()])
    }

    /// Attach standard input to this command.
    #[must_use]
    pub fn with_stdin(mut self, stdin: String) -> Self {
        self.stdin = Some(stdin);
        self
    }
}

impl fmt::Display for Cmd {
    /// Render as a single shell-quoted command line (stdin is not shown).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// The two wire shapes a `runcmd` entry may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdShape {
    /// `["program", "arg", ...]`: executed directly, no shell.
    List(Vec<String>),
    /// `"program arg ..."`: interpreted by `/bin/sh -c`.
    Line(String),
}

impl CmdShape {
    /// Classify a YAML node as one of the accepted shapes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedShape`] for anything that is neither a
    /// string nor a sequence of strings.
    pub fn from_node(module: &str, node: &Value) -> Result<Self, DecodeError> {
        match node {
            Value::String(line) => Ok(Self::Line(line.clone())),
            Value::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(unexpected(module, other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            other => Err(unexpected(module, other)),
        }
    }

    /// Normalize into a [`Cmd`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::EmptyCommand`] for an empty list.
    pub fn into_cmd(self, module: &str) -> Result<Cmd, DecodeError> {
        match self {
            Self::Line(line) => Ok(Cmd::shell(line)),
            Self::List(items) => {
                let mut items = items.into_iter();
                let program = items.next().ok_or_else(|| DecodeError::EmptyCommand {
                    module: module.to_string(),
                })?;
                Ok(Cmd::new(program, items.collect()))
            }
        }
    }
}

/// Decode one command node found inside `module`.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::command::parse_cmd;
///
/// let node: serde_yaml::Value = serde_yaml::from_str("echo hi").unwrap();
/// let cmd = parse_cmd("runcmd", &node).unwrap();
/// assert_eq!(cmd.program, "/bin/sh");
/// assert_eq!(cmd.args, ["-c", "echo hi"]);
/// ```
///
/// # Errors
///
/// Returns a [`DecodeError`] identifying the offending node when it is not a
/// string or a non-empty sequence of strings.
pub fn parse_cmd(module: &str, node: &Value) -> Result<Cmd, DecodeError> {
    CmdShape::from_node(module, node)?.into_cmd(module)
}

fn unexpected(module: &str, node: &Value) -> DecodeError {
    DecodeError::UnexpectedShape {
        module: module.to_string(),
        expected: "a list of strings or a string",
        node: render_node(node),
    }
}

/// Compact single-line rendering of a YAML node for error messages.
pub(crate) fn render_node(node: &Value) -> String {
    serde_json::to_string(node).unwrap_or_else(|_| format!("{node:?}"))
}

/// Quote `s` for a POSIX shell, leaving plain words untouched.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::command::shell_quote;
///
/// assert_eq!(shell_quote("/etc/foo.conf"), "/etc/foo.conf");
/// assert_eq!(shell_quote("cat > /etc/foo"), "'cat > /etc/foo'");
/// assert_eq!(shell_quote("it's"), r"'it'\''s'");
/// ```
#[must_use]
pub fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
