//! Error types for radar

use std::path::PathBuf;

/// Result type for radar operations
pub type Result<T> = std::result::Result<T, RadarError>;

/// Everything that can stop a radar command
#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error(
        "missing required config fields: {}. Please update the config file",
        .missing.join(", ")
    )]
    Validation { missing: Vec<&'static str> },

    #[error(
        "config file not found at {}. Make sure the config dir (ex: .radar) is in the current working directory",
        .path.display()
    )]
    ConfigNotFound { path: PathBuf },

    #[error("could not decode config file {}: {source}", .path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{} Stderr: {}", describe_exit(.code), .stderr.trim_end())]
    ProcessFailed { code: Option<i32>, stderr: String },

    #[error("unsupported direction {0:?}, expected push or pull")]
    UnsupportedDirection(String),

    #[error("interrupted, the sync process was stopped")]
    Interrupted,
}

impl RadarError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("Command failed with exit code {}.", code),
        None => "Command was terminated by a signal.".to_string(),
    }
}
