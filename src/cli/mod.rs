//! CLI module

pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::storage::Backend;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(version)]
#[command(about = "Task list REST API with in-memory or MongoDB storage")]
pub struct Cli {
    /// Config file (defaults to ~/.tasklist/config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Storage backend
        #[arg(short, long, value_enum)]
        backend: Option<Backend>,
        /// Built frontend to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Validate configuration and check the storage backend is reachable
    Check,
}

impl Commands {
    /// What runs when no subcommand is given
    pub fn default_command() -> Self {
        Commands::Serve {
            port: None,
            host: None,
            backend: None,
            static_dir: None,
        }
    }
}
