//! Domain types for Chirpy
//!
//! - Chirp: a single stored message (id + body)
//! - User: a registered user (id + email)

pub mod chirp;
pub mod user;

pub use chirp::{Chirp, ChirpId};
pub use user::{User, UserId};
