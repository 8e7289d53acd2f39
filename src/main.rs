use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use radar::{dispatch, Direction, ProcessRunner, SyncAction, SyncOptions, SyncReport};

#[derive(Parser)]
#[command(name = "radar")]
#[command(about = "Push and pull project files to a remote server with rsync over ssh")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize files and directories
    Sync {
        #[command(subcommand)]
        sync_command: SyncCommands,

        /// Directory name for the config, relative to the current directory
        /// (default: .radar). If you use your own name, pass it on every call
        #[arg(long, global = true)]
        dirname: Option<String>,
    },
}

#[derive(Subcommand)]
enum SyncCommands {
    /// Create a basic configuration file
    CreateConfig,

    /// Push local changes to the remote server
    Push,

    /// Pull remote changes into the local directory
    Pull,
}

impl From<SyncCommands> for SyncAction {
    fn from(command: SyncCommands) -> Self {
        match command {
            SyncCommands::CreateConfig => SyncAction::CreateConfig,
            SyncCommands::Push => SyncAction::Transfer(Direction::Push),
            SyncCommands::Pull => SyncAction::Transfer(Direction::Pull),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // help and version are not errors
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Sync {
            sync_command,
            dirname,
        } => cmd_sync(sync_command, dirname).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Accept the single-dash `-dirname` spelling as `--dirname`
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut positional_only = false;

    args.into_iter()
        .map(|arg| {
            if positional_only {
                return arg;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    positional_only = true;
                    None
                }
                Some(flag) if flag == "-dirname" || flag.starts_with("-dirname=") => {
                    Some(OsString::from(format!("-{}", flag)))
                }
                _ => None,
            };
            rewritten.unwrap_or(arg)
        })
        .collect()
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stderr keeps stdout for the sync output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;

    Ok(())
}

/// Run one `sync` subcommand and print what happened
async fn cmd_sync(sync_command: SyncCommands, dirname: Option<String>) -> radar::Result<()> {
    let options = SyncOptions::new(sync_command.into()).with_dirname(dirname);
    info!("Using config directory: {}", options.dirname);

    let report = dispatch::run(options, ProcessRunner::new()).await?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &SyncReport) {
    match report {
        SyncReport::ConfigCreated(path) => {
            println!("Config file created at {}", path.display());
            println!("You can update the json config file with the necessary info.");
            println!("Note that rsync uses the openssh protocol. If you use a private key,");
            println!("set key_path in the config or add the server to your ssh config file.");
        }
        SyncReport::ConfigExists(path) => {
            println!("Config file {} already exists, leaving it untouched", path.display());
        }
        SyncReport::Transferred { outcome, .. } => {
            if !outcome.stdout.is_empty() {
                println!("Output: {}", outcome.stdout_lossy());
            }
            println!("Command completed successfully");
        }
    }
}
