//! Catch-all for modules this converter does not interpret.
use serde_yaml::Value;

use super::module_value;
use crate::cloud_config::Block;

/// A module captured verbatim; it never produces commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknown {
    /// Module name as written in the document.
    pub name: String,
    /// The module's value: its string items, its single string, or the raw
    /// block body when it has any other shape.
    pub lines: Vec<String>,
}

impl Unknown {
    /// Capture `block` permissively. Never fails.
    #[must_use]
    pub fn from_block(name: String, block: &Block) -> Self {
        tracing::warn!("module '{name}' is not supported and will be ignored");
        let lines = match module_value(block) {
            Ok(Value::String(line)) => vec![line],
            Ok(Value::Sequence(items)) if items.iter().all(Value::is_string) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => block.lines.iter().skip(1).cloned().collect(),
        };
        Self { name, lines }
    }
}
