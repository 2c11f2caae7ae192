//! Common test utilities for integration tests.

#![allow(dead_code)]

use impostor_server::{config::Config, state::AppState};
use impostor_types::{ConnectionId, WsServerMessage};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// App state backed by the fixture corpus, a seeded RNG and an empty
/// static directory.
pub fn test_state() -> (Arc<AppState>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let static_dir = temp_dir.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir,
        words_path: fixture_path("words.json"),
        rng_seed: Some(7),
        outbound_buffer: 64,
    };

    let state = Arc::new(AppState::new(config).expect("Failed to create AppState"));
    (state, temp_dir)
}

/// A fake client: a hub registration plus the coordinator's connect step.
pub struct TestClient {
    pub id: ConnectionId,
    pub rx: mpsc::Receiver<WsServerMessage>,
}

impl TestClient {
    pub fn connect(state: &AppState) -> Self {
        let id = Uuid::new_v4();
        let rx = state.hub.register(id);
        state.coordinator.connect(id);
        Self { id, rx }
    }

    /// Everything queued for this client so far.
    pub fn drain(&mut self) -> Vec<WsServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}

