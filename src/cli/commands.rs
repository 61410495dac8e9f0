//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - post: create a chirp
//! - list: list all chirps
//! - get: show one chirp
//! - validate: check a body without storing it
//! - user: register a user by email
//! - serve: run the socket server

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chirpy - post short messages and read them back in order
#[derive(Parser, Debug)]
#[command(name = "chirpy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides storage.db_path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post a new chirp
    Post {
        /// Message text
        body: String,
    },

    /// List all chirps in id order
    List,

    /// Show a single chirp
    Get {
        /// Chirp ID
        id: u64,
    },

    /// Check a chirp body and print what would be stored
    Validate {
        /// Message text
        body: String,
    },

    /// Register a user
    User {
        /// Email address
        email: String,
    },

    /// Serve chirp requests over a Unix socket
    Serve {
        /// Socket path (overrides server.socket_path)
        #[arg(short, long)]
        socket: Option<PathBuf>,
    },
}
