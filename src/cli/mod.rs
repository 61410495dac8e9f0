//! CLI module for chirpy - command-line interface and subcommands.
//!
//! Provides direct store commands (post, list, get, validate) and `serve`,
//! which exposes the store over a Unix socket.

pub mod commands;

pub use commands::Cli;
