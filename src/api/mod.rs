//! Store façade used by request handlers.

mod policy;
mod service;

pub use policy::{ChirpPolicy, DEFAULT_MAX_LENGTH};
pub use service::ChirpService;
