// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::commands::{
    ConfigUpdate, cd_command, config_command, download_command, info_command, ls_command,
    mkdir_command, pwd_command, reset_command, rm_command, upload_command,
};
use cmd::common::load_context;
use cmd::error_utils::user_message;
use diagnostics::log_debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "cloudnav")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: $CLOUDNAV_CONFIG or ./cloudnav.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session id; keeps a separate navigation position when sessions are enabled
    #[arg(long, global = true, env = "CLOUDNAV_SESSION")]
    session: Option<String>,

    /// Log level (off, error, warn, info, debug); overrides CLOUDNAV_LOG
    #[arg(long, global = true)]
    log: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the current directory, or a child directory without entering it
    Ls {
        name: Option<String>,
    },
    /// Change directory; use ../ to go up
    Cd {
        name: String,
    },
    /// Print the current directory
    Pwd,
    /// Show remote properties of an entry
    Info {
        name: String,
    },
    /// Delete a file or directory
    Rm {
        name: String,
        /// Delete non-empty directories too
        #[arg(short, long)]
        force: bool,
    },
    /// Create a directory
    Mkdir {
        name: String,
    },
    /// Upload a local file into the current directory
    Upload {
        path: PathBuf,
        /// Replace a remote file with the same name
        #[arg(long)]
        overwrite: bool,
    },
    /// Download a file from the current directory
    Download {
        name: String,
        /// Local directory to write into
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,
        /// Replace an existing local file
        #[arg(long)]
        overwrite: bool,
    },
    /// Forget the saved navigation position
    Reset,
    /// Show the configuration, or change and save it
    Config {
        /// Directory for navigation state files
        #[arg(long)]
        data_path: Option<PathBuf>,
        /// Keep one navigation position per session id
        #[arg(long)]
        sessions: Option<bool>,
        /// Use a host directory as the store
        #[arg(long, conflicts_with = "memory")]
        hostdir: Option<PathBuf>,
        /// Use the in-memory scratch store
        #[arg(long)]
        memory: bool,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let print = |line: &str| println!("{line}");
    if let Commands::Config {
        data_path,
        sessions,
        hostdir,
        memory,
    } = cli.command
    {
        let update = ConfigUpdate {
            data_path,
            sessions,
            hostdir,
            memory,
        };
        return config_command(cli.config, update, print);
    }

    let context = load_context(cli.config, cli.session)?;
    log_debug!("Using storage {storage}", storage: context.config.storage.storage_name());

    match cli.command {
        Commands::Ls { name } => ls_command(&context, name.as_deref(), print).await,
        Commands::Cd { name } => cd_command(&context, &name, print).await,
        Commands::Pwd => pwd_command(&context, print).await,
        Commands::Info { name } => info_command(&context, &name, print).await,
        Commands::Rm { name, force } => rm_command(&context, &name, force, print).await,
        Commands::Mkdir { name } => mkdir_command(&context, &name, print).await,
        Commands::Upload { path, overwrite } => {
            upload_command(&context, &path, overwrite, print).await
        }
        Commands::Download {
            name,
            dest,
            overwrite,
        } => download_command(&context, &name, &dest, overwrite, print).await,
        Commands::Reset => reset_command(&context, print),
        // handled before the context is loaded
        Commands::Config { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.log.as_deref() {
        Some(level) => diagnostics::init_with_level(level),
        None => diagnostics::init_diagnostics(),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cloudnav: {}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}
