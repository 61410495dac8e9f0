//! The user record

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store, counted separately from chirp ids.
pub type UserId = u64;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

impl User {
    pub(crate) fn new(id: UserId, email: impl Into<String>) -> Self {
        Self { id, email: email.into() }
    }
}
