//! Read-only category → word list corpus.

use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Minimum number of distinct words a category needs to be dealt.
const MIN_DISTINCT_WORDS: usize = 2;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error reading word corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid word corpus JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Word corpus has no category with at least 2 distinct words")]
    Empty,
}

/// Word lists keyed by category, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct WordCorpus {
    words: BTreeMap<String, Vec<String>>,
}

impl WordCorpus {
    /// Build a corpus from an in-memory map. Categories are not validated.
    pub fn from_map<I, K, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<W>)>,
        K: Into<String>,
        W: Into<String>,
    {
        let words = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
            .collect();
        Self { words }
    }

    /// Load a `{ "category": ["word", ...] }` JSON file.
    pub fn load_from(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path)?;
        let corpus = Self::parse(&content)?;
        info!(
            target: "impostor::corpus",
            "Loaded {} categories ({} playable) from {}",
            corpus.words.len(),
            corpus.playable_categories().len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Parse corpus JSON. Fails if no category is playable.
    pub fn parse(content: &str) -> Result<Self, CorpusError> {
        let words: BTreeMap<String, Vec<String>> = serde_json::from_str(content)?;
        let corpus = Self { words };

        for category in corpus.categories() {
            let distinct = corpus.distinct_words(category).len();
            if distinct < MIN_DISTINCT_WORDS {
                warn!(
                    target: "impostor::corpus",
                    "Category {:?} has {} distinct word(s) and will not be offered",
                    category, distinct
                );
            }
        }

        if corpus.playable_categories().is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(corpus)
    }

    /// All category names, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Categories that can actually be dealt, sorted.
    pub fn playable_categories(&self) -> Vec<String> {
        self.categories()
            .filter(|c| self.distinct_words(c).len() >= MIN_DISTINCT_WORDS)
            .map(str::to_string)
            .collect()
    }

    pub fn words(&self, category: &str) -> Option<&[String]> {
        self.words.get(category).map(Vec::as_slice)
    }

    /// Words of a category with duplicates removed, in first-seen order.
    /// Unknown categories yield an empty list.
    pub fn distinct_words(&self, category: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for word in self.words(category).unwrap_or_default() {
            if !out.contains(&word.as_str()) {
                out.push(word);
            }
        }
        out
    }
}
