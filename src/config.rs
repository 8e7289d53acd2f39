use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{RadarError, Result};

/// Default directory, relative to the working directory, holding the config
pub const DEFAULT_CONFIG_DIR: &str = ".radar";

/// Default config file name inside the config directory
pub const DEFAULT_CONFIG_FILE: &str = "conf.json";

/// Sync settings for one project, persisted as JSON
///
/// Field order is the order keys are written to disk.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Remote host
    pub server_address: String,

    /// Absolute local directory to sync
    pub local_path: String,

    /// Directory on the remote host
    pub remote_path: String,

    /// Remote login
    pub user: String,

    /// Private key handed to ssh with `-i`
    pub key_path: Option<String>,

    /// Glob patterns passed to rsync as `--exclude`
    #[serde(alias = "exlude")]
    pub exclude: Vec<String>,
}

impl SyncConfig {
    /// Fresh config for a project rooted at `local_path`
    pub fn for_local_path(local_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            ..Self::default()
        }
    }

    /// Names of the required fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("server_address", &self.server_address),
            ("local_path", &self.local_path),
            ("remote_path", &self.remote_path),
            ("user", &self.user),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Key path, with an empty string treated as unset
    pub fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref().filter(|key| !key.is_empty())
    }

    /// Expand a leading `~` in local paths; anything else is kept verbatim
    pub fn expand_paths(&mut self) {
        self.local_path = expand_home(&self.local_path);

        if let Some(key) = self.key_path.as_mut() {
            *key = expand_home(key);
        }
    }

    /// Serialize with one-space indentation for hand editing
    pub fn to_json_pretty(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }
}

fn expand_home(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// What `create_config` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A default config was written
    Created(PathBuf),
    /// A config was already there and was left untouched
    AlreadyExists(PathBuf),
}

impl CreateOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(path) | Self::AlreadyExists(path) => path,
        }
    }
}

/// Location of a project's config file: `<root>/<dirname>/<filename>`
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
    dirname: String,
    filename: String,
}

impl ConfigStore {
    pub fn new(root: impl Into<PathBuf>, dirname: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dirname: dirname.into(),
            filename: filename.into(),
        }
    }

    /// Store anchored at the current working directory
    pub fn from_cwd(dirname: impl Into<String>, filename: impl Into<String>) -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| RadarError::io("Could not read the current working directory", e))?;
        Ok(Self::new(cwd, dirname, filename))
    }

    /// Full path of the config file
    pub fn config_path(&self) -> PathBuf {
        self.root.join(&self.dirname).join(&self.filename)
    }

    /// Write a default config unless one already exists
    ///
    /// The default has `local_path` set to the store root and every other
    /// field empty. An existing file is never overwritten.
    pub fn create_config(&self) -> Result<CreateOutcome> {
        let config_path = self.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RadarError::io(format!("Failed to create config directory {}", parent.display()), e)
            })?;
        }

        let config = SyncConfig::for_local_path(self.root.to_string_lossy());
        let content = config.to_json_pretty().map_err(|e| {
            RadarError::io("Failed to serialize default config", std::io::Error::from(e))
        })?;

        if config_path.exists() {
            warn!("Config file {} already exists", config_path.display());
            return Ok(CreateOutcome::AlreadyExists(config_path));
        }

        // staged and linked into place: no partial conf.json on a failed write
        let dir = config_path.parent().unwrap_or(&self.root);
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            RadarError::io(format!("Failed to create temporary file in {}", dir.display()), e)
        })?;
        staged.write_all(&content).map_err(|e| {
            RadarError::io(format!("Failed to write config file {}", config_path.display()), e)
        })?;

        match staged.persist_noclobber(&config_path) {
            Ok(_) => {
                info!("Created default configuration at: {}", config_path.display());
                Ok(CreateOutcome::Created(config_path))
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                warn!("Config file {} already exists", config_path.display());
                Ok(CreateOutcome::AlreadyExists(config_path))
            }
            Err(e) => Err(RadarError::io(
                format!("Failed to create config file {}", config_path.display()),
                e.error,
            )),
        }
    }

    /// Read and decode the config file, expanding its paths
    pub fn load_config(&self) -> Result<SyncConfig> {
        let config_path = self.config_path();
        debug!("Loading config from {}", config_path.display());

        let content = match fs::read(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RadarError::ConfigNotFound { path: config_path });
            }
            Err(e) => {
                return Err(RadarError::io(
                    format!("Failed to read config file {}", config_path.display()),
                    e,
                ));
            }
        };

        let mut config: SyncConfig =
            serde_json::from_slice(&content).map_err(|source| RadarError::MalformedConfig {
                path: config_path.clone(),
                source,
            })?;

        config.expand_paths();

        Ok(config)
    }
}

/// Create `<cwd>/<dirname>/<filename>` with defaults if it does not exist
pub fn create_config(dirname: &str, filename: &str) -> Result<CreateOutcome> {
    ConfigStore::from_cwd(dirname, filename)?.create_config()
}

/// Load `<cwd>/<dirname>/<filename>`
pub fn load_config(dirname: &str, filename: &str) -> Result<SyncConfig> {
    ConfigStore::from_cwd(dirname, filename)?.load_config()
}
