//! Validation and shaping in front of the chirp repository.

use std::sync::Arc;

use log::debug;

use super::policy::ChirpPolicy;
use crate::domain::{Chirp, ChirpId, User};
use crate::error::{ChirpyError, Result};
use crate::moderation::ProfanityFilter;
use crate::storage::ChirpRepository;

/// Validating wrapper around a [`ChirpRepository`].
pub struct ChirpService<R: ChirpRepository> {
    repo: Arc<R>,
    policy: ChirpPolicy,
}

impl<R: ChirpRepository> ChirpService<R> {
    /// Service with the default length limit and word filter.
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            policy: ChirpPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ChirpPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.policy = self.policy.with_max_length(max_length);
        self
    }

    /// Replace the word filter; `None` stores bodies as written.
    pub fn with_filter(mut self, filter: Option<ProfanityFilter>) -> Self {
        self.policy = self.policy.with_filter(filter);
        self
    }

    pub fn policy(&self) -> &ChirpPolicy {
        &self.policy
    }

    /// Check a body without storing it and return what would be stored.
    pub fn validate(&self, body: &str) -> Result<String> {
        self.policy.validate(body)
    }

    pub fn create(&self, body: &str) -> Result<Chirp> {
        let cleaned = self.validate(body)?;
        self.repo.create_record(&cleaned)
    }

    /// All chirps, ascending by id.
    pub fn list(&self) -> Result<Vec<Chirp>> {
        self.repo.list_records()
    }

    pub fn get(&self, id: ChirpId) -> Result<Chirp> {
        let result = self.repo.get_record(id);
        if let Err(ChirpyError::NotFound(_)) = &result {
            debug!("Chirp {} not found", id);
        }
        result
    }

    /// Register a user under the next user id.
    pub fn create_user(&self, email: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ChirpyError::Validation("User email is empty".to_string()));
        }
        self.repo.create_user(email)
    }
}
