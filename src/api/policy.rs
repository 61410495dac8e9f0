//! Body rules shared by create and validate. Touches no storage.

use crate::error::{ChirpyError, Result};
use crate::moderation::ProfanityFilter;

/// Longest accepted body, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 140;

/// Length limit plus optional word filter.
#[derive(Debug, Clone)]
pub struct ChirpPolicy {
    max_length: usize,
    filter: Option<ProfanityFilter>,
}

impl Default for ChirpPolicy {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            filter: Some(ProfanityFilter::default()),
        }
    }
}

impl ChirpPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Replace the word filter; `None` keeps bodies as written.
    pub fn with_filter(mut self, filter: Option<ProfanityFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Trim, check and clean `body`, returning what would be stored.
    pub fn validate(&self, body: &str) -> Result<String> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ChirpyError::Validation("Chirp body is empty".to_string()));
        }

        let length = body.chars().count();
        if length > self.max_length {
            return Err(ChirpyError::Validation(format!(
                "Chirp is too long ({} > {})",
                length, self.max_length
            )));
        }

        Ok(match &self.filter {
            Some(filter) => filter.clean(body),
            None => body.to_string(),
        })
    }
}
