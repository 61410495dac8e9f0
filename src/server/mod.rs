//! Server core - shared context and request handlers
//!
//! The server owns one `ChirpService` and one `HitCounter` and answers
//! requests arriving over the IPC socket.

pub mod context;
pub mod handlers;

pub use context::ServerContext;
