// Shared helpers for integration tests.
//
// Provides canned cloud-config payloads and a temporary-directory-backed
// input file so each integration test can exercise the CLI-facing entry
// points without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use cloudcmd_cli::cli::InputOpts;

/// The worked example: one base64 file followed by one list-form command.
pub const SCENARIO: &str = "\
write_files:
- path: /etc/foo.conf
  content: aGVsbG8=
  encoding: base64
runcmd:
- [\"systemctl\", \"restart\", \"foo\"]
";

/// A realistic bootstrap payload mixing supported and unsupported modules.
pub const KUBEADM_JOIN: &str = include_str!("../fixtures/kubeadm_join.yaml");

/// A cloud-config payload written to a file inside a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct InputFile {
    /// Temporary directory holding the file.
    pub dir: tempfile::TempDir,
    /// Path of the written payload.
    pub path: PathBuf,
}

impl InputFile {
    /// Write `content` to `user-data.yaml` in a fresh temporary directory.
    pub fn new(content: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("user-data.yaml");
        std::fs::write(&path, content).expect("write cloud-config");
        Self { dir, path }
    }

    /// Input options selecting this file.
    pub fn opts(&self) -> InputOpts {
        InputOpts {
            input: self.path.clone(),
        }
    }

    /// Root of the temporary directory.
    pub fn dir_path(&self) -> &Path {
        self.dir.path()
    }
}
