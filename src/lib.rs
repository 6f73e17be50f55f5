//! Agentless cloud-config conversion engine.
//!
//! Turns a cloud-config payload into the ordered shell commands that
//! reproduce it on a freshly provisioned node, so no provisioning agent has
//! to be installed there. Only `write_files` and `runcmd` produce commands;
//! every other module is accepted and ignored.
//!
//! The public API is organised into layers:
//!
//! - **[`cloud_config`]**: validate the document and split it into ordered module blocks
//! - **[`actions`]**: the module registry and the per-module parsers
//! - **[`command`]** and **[`encoding`]**: the command model and `write_files` content decoding
//! - **[`convert`]**: the single entry point tying the layers together
//! - **[`commands`]**: subcommand orchestration (`convert`, `validate`, `run`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod actions;
pub mod cli;
pub mod cloud_config;
pub mod command;
pub mod commands;
pub mod convert;
pub mod encoding;
pub mod error;
pub mod exec;
pub mod logging;
