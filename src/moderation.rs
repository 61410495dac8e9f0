//! Content moderation - replaces banned words with asterisks.

/// Words masked by default.
pub const DEFAULT_BANNED_WORDS: &[&str] = &["kerfuffle", "sharbert", "fornax"];

const MASK: &str = "****";

/// Stateless word filter.
///
/// Splits on single spaces and masks any word whose lowercase form is
/// banned. Words with attached punctuation ("fornax!") are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfanityFilter {
    banned: Vec<String>,
}

impl ProfanityFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            banned: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn clean(&self, body: &str) -> String {
        body.split(' ')
            .map(|word| {
                let lower = word.to_lowercase();
                if self.banned.iter().any(|b| *b == lower) { MASK } else { word }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BANNED_WORDS)
    }
}
