//! Content encodings declared on `write_files` entries.
//!
//! A raw label resolves to an ordered chain of [`Encoding`]s. Decoding applies
//! every step of the chain in order, so `gz+base64` is base64-decoded first
//! and the resulting bytes are then gunzipped. Labels outside the known set
//! are plain text.
use std::fmt;
use std::io::Read as _;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::read::MultiGzDecoder;

use crate::error::ContentDecodeError;

/// A single content transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Standard-alphabet base64 with padding.
    Base64,
    /// A gzip stream.
    Gzip,
}

impl Encoding {
    /// Human-readable name used in log output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Gzip => "gzip",
        }
    }

    fn apply(self, data: &[u8]) -> Result<Vec<u8>, ContentDecodeError> {
        match self {
            Self::Base64 => {
                let compact: Vec<u8> = data
                    .iter()
                    .copied()
                    .filter(|b| !b.is_ascii_whitespace())
                    .collect();
                Ok(STANDARD.decode(compact)?)
            }
            Self::Gzip => {
                let mut out = Vec::new();
                MultiGzDecoder::new(data)
                    .read_to_end(&mut out)
                    .map_err(ContentDecodeError::Gzip)?;
                Ok(out)
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a raw encoding label into the chain of steps to apply, in order.
///
/// Matching is case-insensitive and ignores surrounding whitespace. An empty
/// chain means the content is plain text.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::encoding::{Encoding, resolve};
///
/// assert_eq!(resolve(" GZIP+B64 "), [Encoding::Base64, Encoding::Gzip]);
/// assert_eq!(resolve("b64"), [Encoding::Base64]);
/// assert!(resolve("").is_empty());
/// ```
#[must_use]
pub fn resolve(label: &str) -> Vec<Encoding> {
    match label.trim().to_lowercase().as_str() {
        "gz" | "gzip" => vec![Encoding::Gzip],
        "gz+base64" | "gzip+base64" | "gz+b64" | "gzip+b64" => {
            vec![Encoding::Base64, Encoding::Gzip]
        }
        "base64" | "b64" => vec![Encoding::Base64],
        "" | "text/plain" => Vec::new(),
        other => {
            tracing::warn!("unrecognized content encoding '{other}', treating as plain text");
            Vec::new()
        }
    }
}

/// Decode `content` according to `label`.
///
/// # Examples
///
/// ```
/// use cloudcmd_cli::encoding::decode;
///
/// assert_eq!(decode("aGVsbG8=", "base64").unwrap(), "hello");
/// assert_eq!(decode("plain", "").unwrap(), "plain");
/// ```
///
/// # Errors
///
/// Returns a [`ContentDecodeError`] if a step of the chain fails (malformed
/// base64, invalid or truncated gzip stream) or if the final bytes are not
/// valid UTF-8.
pub fn decode(content: &str, label: &str) -> Result<String, ContentDecodeError> {
    let chain = resolve(label);
    if chain.is_empty() {
        return Ok(content.to_string());
    }

    let mut data = content.as_bytes().to_vec();
    for encoding in chain {
        data = encoding.apply(&data)?;
    }
    Ok(String::from_utf8(data)?)
}
