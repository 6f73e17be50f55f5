//! Cloud-config modules and the registry that maps module names to them.
//!
//! Only `write_files` and `runcmd` generate commands. Every other module is
//! captured as [`Unknown`] so that configurations written for a full
//! cloud-init keep converting.
pub mod runcmd;
pub mod unknown;
pub mod write_files;

use serde_yaml::{Mapping, Value};

pub use runcmd::RunCmd;
pub use unknown::Unknown;
pub use write_files::{FileSpec, WriteFiles};

use crate::cloud_config::Block;
use crate::command::Cmd;
use crate::error::{DecodeError, PartialConversion};

/// Module name of the `write_files` action.
pub const WRITE_FILES: &str = "write_files";
/// Module name of the `runcmd` action.
pub const RUNCMD: &str = "runcmd";

/// Which action parses a block, as selected by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// `write_files`
    WriteFiles,
    /// `runcmd`
    RunCmd,
    /// Any other module, by name.
    Unknown(String),
}

/// Map a module name to the action responsible for it.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::actions::{ActionKind, resolve};
///
/// assert_eq!(resolve("runcmd"), ActionKind::RunCmd);
/// assert_eq!(resolve("bootcmd"), ActionKind::Unknown("bootcmd".to_string()));
/// ```
#[must_use]
pub fn resolve(name: &str) -> ActionKind {
    match name {
        WRITE_FILES => ActionKind::WriteFiles,
        RUNCMD => ActionKind::RunCmd,
        other => ActionKind::Unknown(other.to_string()),
    }
}

impl ActionKind {
    /// Parse `block` into the selected action.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if a recognized module has a malformed
    /// structure. Unknown modules never fail.
    pub fn parse(self, block: &Block) -> Result<Action, DecodeError> {
        Ok(match self {
            Self::WriteFiles => Action::WriteFiles(WriteFiles::from_block(block)?),
            Self::RunCmd => Action::RunCmd(RunCmd::from_block(block)?),
            Self::Unknown(name) => Action::Unknown(Unknown::from_block(name, block)),
        })
    }
}

/// A parsed cloud-config module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Files to write on the node.
    WriteFiles(WriteFiles),
    /// Commands to run on the node.
    RunCmd(RunCmd),
    /// A module this converter does not interpret.
    Unknown(Unknown),
}

impl Action {
    /// Resolve and parse a scanned block.
    ///
    /// # Errors
    ///
    /// See [`ActionKind::parse`].
    pub fn from_block(block: &Block) -> Result<Self, DecodeError> {
        resolve(&block.key).parse(block)
    }

    /// Module name this action was parsed from.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::WriteFiles(_) => WRITE_FILES,
            Self::RunCmd(_) => RUNCMD,
            Self::Unknown(unknown) => unknown.name.as_str(),
        }
    }

    /// Commands that reproduce this module on the node, in order.
    ///
    /// # Errors
    ///
    /// Returns a [`PartialConversion`] holding the commands generated before
    /// a `write_files` entry failed to decode.
    pub fn commands(&self) -> Result<Vec<Cmd>, PartialConversion> {
        match self {
            Self::WriteFiles(action) => action.commands(),
            Self::RunCmd(action) => Ok(action.commands()),
            Self::Unknown(_) => Ok(Vec::new()),
        }
    }
}

/// Parse a block as a standalone document and take the value under its key.
///
/// A key without a value yields [`Value::Null`].
pub(crate) fn module_value(block: &Block) -> Result<Value, DecodeError> {
    let mut document: Mapping =
        serde_yaml::from_str(&block.text()).map_err(|source| DecodeError::Block {
            module: block.key.clone(),
            source,
        })?;
    Ok(document.remove(block.key.as_str()).unwrap_or(Value::Null))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn block(key: &str, text: &str) -> Block {
        Block {
            key: key.to_string(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    #[test]
    fn resolve_recognized_modules() {
        assert_eq!(resolve("write_files"), ActionKind::WriteFiles);
        assert_eq!(resolve("runcmd"), ActionKind::RunCmd);
    }

    #[test]
    fn resolve_is_exact_match() {
        assert_eq!(
            resolve("RunCmd"),
            ActionKind::Unknown("RunCmd".to_string())
        );
    }

    #[test]
    fn from_block_dispatches_by_key() {
        let action = Action::from_block(&block("runcmd", "runcmd:\n- reboot")).unwrap();
        assert!(matches!(action, Action::RunCmd(_)));
        assert_eq!(action.name(), "runcmd");

        let action = Action::from_block(&block("packages", "packages:\n- vim")).unwrap();
        assert!(matches!(action, Action::Unknown(_)));
        assert_eq!(action.name(), "packages");
    }

    #[test]
    fn unknown_action_has_no_commands() {
        let action = Action::from_block(&block("bootcmd", "bootcmd:\n- echo early")).unwrap();
        assert!(action.commands().unwrap().is_empty());
    }

    #[test]
    fn module_value_missing_value_is_null() {
        assert_eq!(module_value(&block("runcmd", "runcmd:")).unwrap(), Value::Null);
    }

    #[test]
    fn module_value_reports_module_on_bad_yaml() {
        let err = module_value(&block("runcmd", "runcmd:\n- *missing_anchor")).unwrap_err();
        assert!(
            matches!(&err, DecodeError::Block { module, .. } if module == "runcmd"),
            "unexpected error: {err:?}"
        );
    }
}
