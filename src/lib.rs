//! Radar - push and pull a project directory to a remote host
//!
//! Radar reads a small JSON config kept next to a project (`.radar/conf.json`
//! by default) and runs `rsync` over `ssh` to copy the project to, or back
//! from, a remote host.
//!
//! ## Modules
//!
//! - [`config`]: Sync config and where it lives on disk
//! - [`command`]: Building the rsync argument vector
//! - [`process`]: Running the sync utility and capturing its output
//! - [`dispatch`]: Mapping `sync` subcommands onto the above
//! - [`error`]: Error taxonomy shared by all modules

pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod process;

pub use command::{build_command, Direction};
pub use config::{ConfigStore, CreateOutcome, SyncConfig};
pub use dispatch::{Dispatcher, SyncAction, SyncOptions, SyncReport};
pub use error::{RadarError, Result};
pub use process::{ProcessOutcome, ProcessRunner, Runner};
