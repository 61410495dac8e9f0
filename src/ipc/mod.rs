//! IPC Layer - Unix socket transport for chirp requests
//!
//! This module provides:
//! - Message types for requests and responses
//! - Unix socket server that routes requests to a handler

pub mod messages;
pub mod server;

pub use messages::{ChirpRequest, ChirpResponse, ErrorCode, Methods, ResponseError};
pub use server::{IpcServer, IpcServerConfig, RequestHandler};
