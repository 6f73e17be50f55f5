//! The `write_files` module: files written through `cat` on the node.
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::WRITE_FILES;
use crate::cloud_config::Block;
use crate::command::{Cmd, shell_quote};
use crate::encoding;
use crate::error::{ConvertError, DecodeError, PartialConversion};

/// Owner applied by cloud-init when none is declared.
pub const DEFAULT_OWNER: &str = "root:root";
/// Permissions applied by cloud-init when none are declared.
pub const DEFAULT_PERMISSIONS: &str = "0644";

/// One `write_files` entry, as declared.
///
/// Absent or null fields take their zero value; normalization happens in the
/// accessor methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileSpec {
    /// Destination path.
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    /// Raw content encoding label (case-insensitive).
    #[serde(deserialize_with = "null_as_default")]
    pub encoding: String,
    /// `user:group` ownership.
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    /// Octal permission string. Unquoted YAML numbers are accepted.
    #[serde(deserialize_with = "permissions_string")]
    pub permissions: String,
    /// Content, encoded as declared by `encoding`.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    /// Append to the file instead of truncating it.
    #[serde(deserialize_with = "null_as_default")]
    pub append: bool,
}

impl FileSpec {
    /// Destination path with surrounding whitespace removed.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.trim()
    }

    /// Declared owner, or [`DEFAULT_OWNER`].
    #[must_use]
    pub fn owner(&self) -> &str {
        non_empty_or(&self.owner, DEFAULT_OWNER)
    }

    /// Declared permissions, or [`DEFAULT_PERMISSIONS`].
    #[must_use]
    pub fn permissions(&self) -> &str {
        non_empty_or(&self.permissions, DEFAULT_PERMISSIONS)
    }

    /// Commands that write this file, given its already decoded content.
    fn commands(&self, content: String) -> Vec<Cmd> {
        let path = self.path();
        let redirect = if self.append { ">>" } else { ">" };

        let mut commands = vec![
            Cmd::new("mkdir", vec!["-p".to_string(), directory_of(path)]),
            Cmd::shell(format!("cat {redirect} {} /dev/stdin", shell_quote(path)))
                .with_stdin(content),
        ];

        let permissions = self.permissions();
        if permissions != DEFAULT_PERMISSIONS {
            commands.push(Cmd::new(
                "chmod",
                vec![permissions.to_string(), path.to_string()],
            ));
        }

        let owner = self.owner();
        if owner != DEFAULT_OWNER {
            commands.push(Cmd::new("chown", vec![owner.to_string(), path.to_string()]));
        }

        commands
    }
}

/// Parsed `write_files` module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WriteFiles {
    /// Files in declaration order.
    #[serde(default, rename = "write_files", deserialize_with = "null_as_default")]
    pub files: Vec<FileSpec>,
}

impl WriteFiles {
    /// Parse a `write_files:` block.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the value is not a list of file mappings
    /// with the expected field types.
    pub fn from_block(block: &Block) -> Result<Self, DecodeError> {
        let action: Self =
            serde_yaml::from_str(&block.text()).map_err(|source| DecodeError::Block {
                module: WRITE_FILES.to_string(),
                source,
            })?;
        tracing::debug!("parsed {} write_files entries", action.files.len());
        Ok(action)
    }

    /// Commands that write every file, in declaration order.
    ///
    /// Per file: `mkdir -p <dir>`, `/bin/sh -c "cat > <path> /dev/stdin"` fed
    /// the decoded content, then `chmod`/`chown` only when they differ from
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Stops at the first file whose content cannot be decoded and returns a
    /// [`PartialConversion`] holding the commands of the files before it.
    pub fn commands(&self) -> Result<Vec<Cmd>, PartialConversion> {
        let mut commands = Vec::new();
        for file in &self.files {
            let content = match encoding::decode(&file.content, &file.encoding) {
                Ok(content) => content,
                Err(source) => {
                    let error = ConvertError::ContentDecode {
                        path: file.path().to_string(),
                        source,
                    };
                    return Err(PartialConversion::new(commands, error));
                }
            };
            tracing::debug!("writing {} ({} bytes)", file.path(), content.len());
            commands.extend(file.commands(content));
        }
        Ok(commands)
    }
}

/// Parent directory of `path`, following `dirname` conventions.
fn directory_of(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if parent.as_os_str().is_empty() => ".".to_string(),
        Some(parent) => parent.to_string_lossy().into_owned(),
        None if path.starts_with('/') => "/".to_string(),
        None => ".".to_string(),
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { default } else { value }
}

/// Accept `permissions` as a string or a bare number.
fn permissions_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Mode {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Mode>::deserialize(deserializer)? {
        Some(Mode::Text(text)) => text,
        Some(Mode::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Deserialize an explicit YAML null as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
