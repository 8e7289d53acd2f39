//! Command builder - turns a sync config into an rsync argument vector
//!
//! The result is a list of discrete tokens handed straight to the process
//! runner. Nothing is ever joined into a string and split again, so paths
//! and exclude patterns containing spaces stay intact.

use std::fmt;
use std::str::FromStr;

use crate::config::SyncConfig;
use crate::error::{RadarError, Result};

/// External sync utility
pub const RSYNC_PROGRAM: &str = "rsync";

/// Archive mode, verbose, compressed
const RSYNC_FLAGS: &str = "-avz";

/// Remote shell used as the transport
const TRANSPORT: &str = "ssh";

/// Which way files flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Local directory to remote host
    Push,
    /// Remote host to local directory
    Pull,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "push" => Ok(Self::Push),
            "pull" => Ok(Self::Pull),
            other => Err(RadarError::UnsupportedDirection(other.to_string())),
        }
    }
}

/// Build the rsync argument vector for `config` in `direction`
///
/// `argv[0]` is the program. The last two tokens are the source and
/// destination: `local_path user@host:remote_path` for a push and the
/// reverse for a pull.
pub fn build_command(config: &SyncConfig, direction: Direction) -> Result<Vec<String>> {
    let missing = config.missing_fields();
    if !missing.is_empty() {
        return Err(RadarError::Validation { missing });
    }

    let mut argv = vec![
        RSYNC_PROGRAM.to_string(),
        RSYNC_FLAGS.to_string(),
        "-e".to_string(),
        transport_spec(config.key_path()),
    ];

    argv.extend(
        config
            .exclude
            .iter()
            .map(|pattern| format!("--exclude={}", pattern)),
    );

    let remote = remote_spec(config);
    let local = config.local_path.clone();

    match direction {
        Direction::Push => argv.extend([local, remote]),
        Direction::Pull => argv.extend([remote, local]),
    }

    Ok(argv)
}

/// Build for a direction given by name, as typed on the command line
pub fn build_command_for(config: &SyncConfig, direction: &str) -> Result<Vec<String>> {
    build_command(config, direction.parse()?)
}

/// `user@server_address:remote_path`
pub fn remote_spec(config: &SyncConfig) -> String {
    format!(
        "{}@{}:{}",
        config.user, config.server_address, config.remote_path
    )
}

/// Value for rsync's `-e` option, always a single token
fn transport_spec(key_path: Option<&str>) -> String {
    match key_path {
        Some(key) => format!("{} -i {}", TRANSPORT, quote(key)),
        None => TRANSPORT.to_string(),
    }
}

/// Quote a word so rsync keeps it whole when it splits the `-e` value
///
/// rsync honours single and double quotes and treats a doubled quote
/// character inside them as a literal one. Backslashes are never special.
pub fn quote(word: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "-_./~@%+=:,".contains(c);

    if !word.is_empty() && word.chars().all(is_safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "''"))
    }
}

/// Human readable rendering of an argument vector, for logs only
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|token| quote(token))
        .collect::<Vec<_>>()
        .join(" ")
}
