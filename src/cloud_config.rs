//! Cloud-config document validation and order-preserving block scanning.
//!
//! A YAML mapping has no guaranteed iteration order once decoded, but module
//! order in the output is significant. The document is therefore validated as
//! a whole first and then carved into top-level blocks line by line.
use serde::Deserialize as _;
use serde_yaml::{Deserializer, Mapping};

use crate::error::SyntaxError;

/// The contiguous raw text belonging to one top-level module.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::cloud_config::Block;
///
/// let block = Block {
///     key: "runcmd".to_string(),
///     lines: vec!["runcmd:".to_string(), "- reboot".to_string()],
/// };
/// assert_eq!(block.text(), "runcmd:\n- reboot");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Module name (the text before the colon of the opening line).
    pub key: String,
    /// Every line of the block, starting with the opening key line.
    pub lines: Vec<String>,
}

impl Block {
    /// The block re-joined into a standalone YAML document.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Confirm `raw` is a well-formed YAML document whose root is a mapping.
///
/// An empty (or comment-only) payload counts as an empty mapping.
///
/// # Errors
///
/// Returns a [`SyntaxError`] if the payload does not parse, parses to
/// something other than a mapping, or holds more than one document.
pub fn validate(raw: &[u8]) -> Result<(), SyntaxError> {
    let mut documents = Deserializer::from_slice(raw);
    if let Some(document) = documents.next() {
        Option::<Mapping>::deserialize(document)?;
    }
    if documents.next().is_some() {
        return Err(SyntaxError(serde::de::Error::custom(
            "expected a single document, found more than one",
        )));
    }
    Ok(())
}

/// Split `raw` into its top-level blocks, in source order.
///
/// A line opens a new block when it starts at column zero with one or more
/// ASCII letters or underscores immediately followed by a colon. Lines before
/// the first such line belong to no block and are dropped.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::cloud_config::split;
///
/// let blocks = split(b"#cloud-config\nruncmd:\n- reboot\nwrite_files: []\n");
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].key, "runcmd");
/// assert_eq!(blocks[0].lines, ["runcmd:", "- reboot"]);
/// assert_eq!(blocks[1].key, "write_files");
/// ```
#[must_use]
pub fn split(raw: &[u8]) -> Vec<Block> {
    let content = String::from_utf8_lossy(raw);
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for line in content.lines() {
        if let Some(key) = parse_block_key(line) {
            if let Some(block) = current.take() {
                tracing::debug!("scanned block '{}' ({} lines)", block.key, block.lines.len());
                blocks.push(block);
            }
            current = Some(Block {
                key: key.to_string(),
                lines: Vec::new(),
            });
        }
        if let Some(ref mut block) = current {
            block.lines.push(line.to_string());
        }
    }

    if let Some(block) = current {
        tracing::debug!("scanned block '{}' ({} lines)", block.key, block.lines.len());
        blocks.push(block);
    }

    blocks
}

/// Parse a `name:` line into its module name.
fn parse_block_key(line: &str) -> Option<&str> {
    let (key, _) = line.split_once(':')?;
    let is_key = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
    is_key.then_some(key)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // validate
    // -----------------------------------------------------------------------

    #[test]
    fn validate_accepts_mapping() {
        assert!(validate(b"runcmd:\n- reboot\n").is_ok());
    }

    #[test]
    fn validate_accepts_empty_mapping_and_empty_input() {
        assert!(validate(b"{}").is_ok());
        assert!(validate(b"").is_ok());
        assert!(validate(b"#cloud-config\n").is_ok());
    }

    #[test]
    fn validate_rejects_unterminated_quote() {
        assert!(validate(b"runcmd:\n- \"echo hi\n").is_err());
    }

    #[test]
    fn validate_rejects_bad_indentation() {
        assert!(validate(b"write_files:\n  - path: /a\n content: b\n").is_err());
    }

    #[test]
    fn validate_rejects_multiple_documents() {
        let err = validate(b"a: 1\n---\nb: 2\n").unwrap_err();
        assert!(err.to_string().contains("single document"), "{err}");
    }

    #[test]
    fn validate_accepts_leading_document_marker() {
        assert!(validate(b"---\nruncmd: []\n").is_ok());
    }

    #[test]
    fn validate_rejects_non_mapping_root() {
        assert!(validate(b"- a\n- b\n").is_err());
        assert!(validate(b"just a string").is_err());
    }

    // -----------------------------------------------------------------------
    // split
    // -----------------------------------------------------------------------

    #[test]
    fn split_preserves_source_order() {
        let raw = b"runcmd:\n- a\nwrite_files:\n- path: /x\nbootcmd:\n- b\n";
        let keys: Vec<_> = split(raw).into_iter().map(|b| b.key).collect();
        assert_eq!(keys, ["runcmd", "write_files", "bootcmd"]);
    }

    #[test]
    fn split_assigns_following_lines_to_current_block() {
        let raw = b"write_files:\n- path: /etc/a\n  content: |\n    x: y\nruncmd:\n- reboot\n";
        let blocks = split(raw);
        assert_eq!(
            blocks[0].lines,
            [
                "write_files:",
                "- path: /etc/a",
                "  content: |",
                "    x: y"
            ]
        );
        assert_eq!(blocks[1].lines, ["runcmd:", "- reboot"]);
    }

    #[test]
    fn split_drops_preamble() {
        let blocks = split(b"#cloud-config\n\nruncmd:\n- a\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines[0], "runcmd:");
    }

    #[test]
    fn split_ignores_indented_keys() {
        let blocks = split(b"write_files:\n- path: /a\n  owner: root:root\n");
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn split_key_with_inline_value() {
        let blocks = split(b"runcmd: []\n");
        assert_eq!(blocks[0].key, "runcmd");
    }

    #[test]
    fn split_empty_input() {
        assert!(split(b"").is_empty());
        assert!(split(b"{}").is_empty());
    }

    #[test]
    fn parse_block_key_rules() {
        assert_eq!(parse_block_key("write_files:"), Some("write_files"));
        assert_eq!(parse_block_key("ssh_authorized_keys: []"), Some("ssh_authorized_keys"));
        assert_eq!(parse_block_key(" runcmd:"), None);
        assert_eq!(parse_block_key(":"), None);
        assert_eq!(parse_block_key("runcmd2:"), None);
        assert_eq!(parse_block_key("- a: b"), None);
        assert_eq!(parse_block_key("runcmd"), None);
    }
}
