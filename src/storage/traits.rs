//! Repository trait consumed by the façade.

use crate::domain::{Chirp, ChirpId, User};
use crate::error::Result;

/// Durable keeper of chirps and users.
pub trait ChirpRepository: Send + Sync {
    /// Assign the next id to `body` and persist it.
    fn create_record(&self, body: &str) -> Result<Chirp>;

    /// Every chirp, ascending by id.
    fn list_records(&self) -> Result<Vec<Chirp>>;

    /// A single chirp, or `ChirpyError::NotFound`.
    fn get_record(&self, id: ChirpId) -> Result<Chirp>;

    /// Assign the next user id to `email` and persist it.
    fn create_user(&self, email: &str) -> Result<User>;
}
