//! Dispatcher - maps a parsed `sync` subcommand onto the config store,
//! the command builder and the process runner
//!
//! Nothing here exits the process. Every failure comes back as a
//! `RadarError` and the binary decides the exit status.

use std::path::PathBuf;
use tracing::info;

use crate::command::{build_command, display_command, Direction};
use crate::config::{ConfigStore, CreateOutcome, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::process::{ProcessOutcome, Runner};

/// What the user asked `radar sync` to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Write a default config if none exists
    CreateConfig,
    /// Run rsync in the given direction
    Transfer(Direction),
}

/// Parsed and validated options for one `radar sync` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub action: SyncAction,
    pub dirname: String,
    pub filename: String,
}

impl SyncOptions {
    /// Options using the default config location
    pub fn new(action: SyncAction) -> Self {
        Self {
            action,
            dirname: DEFAULT_CONFIG_DIR.to_string(),
            filename: DEFAULT_CONFIG_FILE.to_string(),
        }
    }

    /// Use `dirname` instead of `.radar`; an empty name keeps the default
    pub fn with_dirname(mut self, dirname: Option<String>) -> Self {
        if let Some(dirname) = dirname.filter(|d| !d.is_empty()) {
            self.dirname = dirname;
        }
        self
    }
}

/// What a successful invocation did, for the binary to print
#[derive(Debug)]
pub enum SyncReport {
    ConfigCreated(PathBuf),
    ConfigExists(PathBuf),
    Transferred {
        direction: Direction,
        outcome: ProcessOutcome,
    },
}

/// Runs `sync` subcommands against one config location
pub struct Dispatcher<R> {
    store: ConfigStore,
    runner: R,
}

impl<R: Runner> Dispatcher<R> {
    pub fn new(store: ConfigStore, runner: R) -> Self {
        Self { store, runner }
    }

    /// Dispatcher anchored at the current working directory
    pub fn from_cwd(options: &SyncOptions, runner: R) -> Result<Self> {
        let store = ConfigStore::from_cwd(&options.dirname, &options.filename)?;
        Ok(Self::new(store, runner))
    }

    pub async fn execute(&self, action: SyncAction) -> Result<SyncReport> {
        match action {
            SyncAction::CreateConfig => match self.store.create_config()? {
                CreateOutcome::Created(path) => Ok(SyncReport::ConfigCreated(path)),
                CreateOutcome::AlreadyExists(path) => Ok(SyncReport::ConfigExists(path)),
            },
            SyncAction::Transfer(direction) => self.transfer(direction).await,
        }
    }

    async fn transfer(&self, direction: Direction) -> Result<SyncReport> {
        let config = self.store.load_config()?;
        let argv = build_command(&config, direction)?;

        info!("Rsync command: {}", display_command(&argv));

        let outcome = self.runner.run(&argv).await?.into_result()?;

        info!("{} completed successfully", direction);
        Ok(SyncReport::Transferred { direction, outcome })
    }
}

/// Run one `radar sync` invocation from the current working directory
pub async fn run<R: Runner>(options: SyncOptions, runner: R) -> Result<SyncReport> {
    Dispatcher::from_cwd(&options, runner)?
        .execute(options.action)
        .await
}
