//! Shared application state.

use crate::config::Config;
use crate::hub::ConnectionHub;
use impostor_core::{CoordinatorConfig, CorpusError, SessionCoordinator, WordCorpus};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
    pub hub: Arc<ConnectionHub>,
    pub config: Config,
}

impl AppState {
    /// Load the word corpus from `config.words_path` and build the state.
    pub fn new(config: Config) -> Result<Self, CorpusError> {
        let corpus = WordCorpus::load_from(&config.words_path)?;
        Ok(Self::with_corpus(config, corpus))
    }

    pub fn with_corpus(config: Config, corpus: WordCorpus) -> Self {
        let hub = Arc::new(ConnectionHub::new(config.outbound_buffer));
        let coordinator = Arc::new(SessionCoordinator::new(
            CoordinatorConfig {
                rng_seed: config.rng_seed,
            },
            Arc::new(corpus),
            hub.clone(),
        ));

        Self {
            coordinator,
            hub,
            config,
        }
    }
}
