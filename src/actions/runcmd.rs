//! The `runcmd` module: commands run in declaration order.
use serde_yaml::Value;

use super::{RUNCMD, module_value};
use crate::cloud_config::Block;
use crate::command::{Cmd, parse_cmd, render_node};
use crate::error::DecodeError;

/// Parsed `runcmd` module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCmd {
    /// Commands in declaration order.
    pub cmds: Vec<Cmd>,
}

impl RunCmd {
    /// Parse a `runcmd:` block.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the value is not a list or any entry is
    /// neither a string nor a non-empty list of strings.
    pub fn from_block(block: &Block) -> Result<Self, DecodeError> {
        let items = match module_value(block)? {
            Value::Null => Vec::new(),
            Value::Sequence(items) => items,
            other => {
                return Err(DecodeError::UnexpectedShape {
                    module: RUNCMD.to_string(),
                    expected: "a list of commands",
                    node: render_node(&other),
                });
            }
        };

        let cmds = items
            .iter()
            .map(|node| parse_cmd(RUNCMD, node))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("parsed {} runcmd command(s)", cmds.len());
        Ok(Self { cmds })
    }

    /// The declared commands, unchanged.
    #[must_use]
    pub fn commands(&self) -> Vec<Cmd> {
        self.cmds.clone()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<RunCmd, DecodeError> {
        RunCmd::from_block(&Block {
            key: RUNCMD.to_string(),
            lines: text.lines().map(str::to_string).collect(),
        })
    }

    #[test]
    fn mixed_shapes_preserve_order() {
        let action = parse(
            "runcmd:\n- [systemctl, daemon-reload]\n- echo done > /tmp/marker\n- [\"kubeadm\", \"init\"]",
        )
        .unwrap();
        let commands = action.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], Cmd::new("systemctl", vec!["daemon-reload".to_string()]));
        assert_eq!(commands[1], Cmd::shell("echo done > /tmp/marker"));
        assert_eq!(commands[2].program, "kubeadm");
    }

    #[test]
    fn empty_and_null_values_yield_no_commands() {
        assert!(parse("runcmd: []").unwrap().commands().is_empty());
        assert!(parse("runcmd:").unwrap().commands().is_empty());
    }

    #[test]
    fn scalar_value_is_rejected() {
        let err = parse("runcmd: reboot").unwrap_err();
        assert!(
            matches!(err, DecodeError::UnexpectedShape { expected: "a list of commands", .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn malformed_entry_fails_whole_action() {
        let err = parse("runcmd:\n- ls\n- {cmd: ls}").unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedShape { .. }));
    }
}
