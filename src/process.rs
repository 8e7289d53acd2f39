//! Process runner - launches the sync utility and collects its output
//!
//! Stdout and stderr are drained by two spawned tasks while the parent waits
//! on the child, so a child that fills one pipe can never block against us.
//! Both drains are joined before the outcome is assembled.

use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command as AsyncCommand;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{RadarError, Result};

/// Result of running the external process to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code, `None` when the child was killed by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub success: bool,
}

impl ProcessOutcome {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Turn a failed outcome into `ProcessFailed`
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(RadarError::ProcessFailed {
                code: self.code,
                stderr: self.stderr_lossy(),
            })
        }
    }
}

/// Something that can run an argument vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run `argv[0]` with the remaining tokens as arguments
    ///
    /// A non-zero exit is a successful call returning a failed outcome.
    /// Only a launch failure or interruption is an `Err`.
    async fn run(&self, argv: &[String]) -> Result<ProcessOutcome>;
}

/// Runs commands as child processes, no shell involved
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `argv`, killing the child if `cancel` completes first
    pub async fn run_until<F>(&self, argv: &[String], cancel: F) -> Result<ProcessOutcome>
    where
        F: Future<Output = ()>,
    {
        let (program, args) = argv.split_first().ok_or_else(|| RadarError::Launch {
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
        })?;

        debug!("Spawning {} with {} arguments", program, args.len());

        let mut child = AsyncCommand::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RadarError::Launch {
                program: program.clone(),
                source,
            })?;

        let stdout_task = spawn_drain(child.stdout.take());
        let stderr_task = spawn_drain(child.stderr.take());

        let status = tokio::select! {
            status = child.wait() => status.map_err(|e| {
                RadarError::io(format!("Failed to wait for {}", program), e)
            })?,
            _ = cancel => {
                warn!("Stopping {} before it finished", program);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", program, e);
                }
                return Err(RadarError::Interrupted);
            }
        };

        let (stdout, stderr) = tokio::try_join!(join_drain(stdout_task), join_drain(stderr_task))?;

        debug!(
            "{} exited with {:?} ({} bytes stdout, {} bytes stderr)",
            program,
            status.code(),
            stdout.len(),
            stderr.len()
        );

        Ok(ProcessOutcome {
            code: status.code(),
            stdout,
            stderr,
            success: status.success(),
        })
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn run(&self, argv: &[String]) -> Result<ProcessOutcome> {
        self.run_until(argv, interrupted()).await
    }
}

/// Resolves on Ctrl-C, never if the handler cannot be installed
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received");
}

fn spawn_drain<R>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

async fn join_drain(task: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    task.await
        .map_err(|e| RadarError::io("Output reader task failed", io::Error::other(e)))?
        .map_err(|e| RadarError::io("Failed to read process output", e))
}
