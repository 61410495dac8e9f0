//! Chirpy - a minimal chirp service
//!
//! Clients post short messages and read them back in order. Every chirp and
//! user lives in a single JSON file guarded by a read/write lock; ids are
//! assigned monotonically per record kind and never reused, even across
//! restarts.

pub mod api;
pub mod domain;
pub mod error;
pub mod ipc;
pub mod metrics;
pub mod moderation;
pub mod server;
pub mod storage;

pub use api::{ChirpPolicy, ChirpService};
pub use domain::{Chirp, ChirpId, User, UserId};
pub use error::{ChirpyError, Result};
pub use storage::ChirpStore;
