//! Cloud-config to command list conversion.
use crate::actions::Action;
use crate::cloud_config;
use crate::command::Cmd;
use crate::error::{ConvertError, PartialConversion};

/// Convert a raw cloud-config payload into the ordered commands that
/// reproduce it on a node.
///
/// The payload is validated as a whole, then split into top-level modules in
/// source order. Each module is parsed and expanded before the next one, and
/// the resulting command lists are concatenated.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::convert::convert;
///
/// let commands = convert(b"runcmd:\n- [systemctl, restart, foo]\n").unwrap();
/// assert_eq!(commands[0].to_string(), "systemctl restart foo");
///
/// assert!(convert(b"{}").unwrap().is_empty());
/// ```
///
/// # Errors
///
/// Returns a [`PartialConversion`] holding every command generated before the
/// failure. It is empty for a syntax error, since nothing is scanned until
/// the whole document is known to be well-formed.
pub fn convert(raw: &[u8]) -> Result<Vec<Cmd>, PartialConversion> {
    cloud_config::validate(raw).map_err(|e| PartialConversion::new(Vec::new(), e.into()))?;

    let mut commands = Vec::new();
    for block in cloud_config::split(raw) {
        let action = match Action::from_block(&block) {
            Ok(action) => action,
            Err(e) => return Err(PartialConversion::new(commands, ConvertError::from(e))),
        };

        match action.commands() {
            Ok(cmds) => {
                tracing::debug!("module '{}': {} command(s)", action.name(), cmds.len());
                commands.extend(cmds);
            }
            Err(partial) => {
                commands.extend(partial.commands);
                return Err(PartialConversion::new(commands, partial.source));
            }
        }
    }

    Ok(commands)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn empty_mapping_yields_nothing() {
        assert!(convert(b"{}").unwrap().is_empty());
        assert!(convert(b"").unwrap().is_empty());
    }

    #[test]
    fn syntax_error_yields_no_commands() {
        let partial = convert(b"runcmd:\n- 'unterminated\n").unwrap_err();
        assert!(partial.commands.is_empty());
        assert!(matches!(partial.source, ConvertError::Syntax(_)));
    }

    #[test]
    fn output_follows_module_order() {
        let raw = b"runcmd:\n- first\nwrite_files:\n- path: /x/y\nbootcmd:\n- ignored\n";
        let commands = convert(raw).unwrap();
        let programs: Vec<_> = commands.iter().map(|c| c.program.as_str()).collect();
        assert_eq!(programs, ["/bin/sh", "mkdir", "/bin/sh"]);
        assert_eq!(commands[0].args[1], "first");
    }

    #[test]
    fn unknown_modules_never_fail() {
        let raw = b"users:\n- default\n- name: core\npackages: [vim]\nruncmd:\n- reboot\n";
        let commands = convert(raw).unwrap();
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn decode_error_keeps_commands_of_earlier_modules() {
        let raw = b"write_files:\n- path: /x\nntp:\n  enabled: true\nruncmd:\n- ok\n- {x: 1}\n";
        let partial = convert(raw).unwrap_err();
        assert_eq!(partial.commands.len(), 2);
        assert!(matches!(
            partial.source,
            ConvertError::Decode(DecodeError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn content_error_keeps_earlier_modules_and_files() {
        let raw = b"runcmd:\n- a\nwrite_files:\n- path: /ok\n- path: /bad\n  encoding: gzip\n  content: plain\nfinal_message: never\n";
        let partial = convert(raw).unwrap_err();
        assert_eq!(partial.commands.len(), 3);
        assert!(matches!(
            &partial.source,
            ConvertError::ContentDecode { path, .. } if path == "/bad"
        ));
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let raw = b"write_files:\n- path: /a\n  content: aGk=\n  encoding: b64\nruncmd:\n- ls\n";
        assert_eq!(convert(raw).unwrap(), convert(raw).unwrap());
    }
}
