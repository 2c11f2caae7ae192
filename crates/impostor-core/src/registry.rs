//! Registry of live rooms.

use crate::{GameError, Result, Room};
use dashmap::DashMap;
use impostor_types::{RoomId, RoomSummary};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::info;

/// Longest room title kept, in characters.
pub const MAX_TITLE_CHARS: usize = 64;

/// A registered room: listing metadata readable without the room lock,
/// plus the room itself behind its own lock.
#[derive(Debug)]
pub struct RoomHandle {
    id: RoomId,
    title: String,
    head_count: AtomicUsize,
    room: Mutex<Room>,
}

impl RoomHandle {
    /// Head count as of the last roster change.
    pub fn head_count(&self) -> usize {
        self.head_count.load(Ordering::Acquire)
    }

    /// Publish the roster size after a mutation, while still holding the lock.
    pub(crate) fn publish_head_count(&self, room: &Room) {
        self.head_count.store(room.len(), Ordering::Release);
    }

    /// Exclusive access to the room.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Room> {
        self.room.lock().await
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.id,
            title: self.title.clone(),
            head_count: self.head_count(),
        }
    }
}

/// Owns every room and allocates room ids.
///
/// Rooms are removed automatically by the coordinator when their last member
/// leaves. A room that was created but never joined stays listed.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Arc<RoomHandle>>,
    next_id: AtomicU64,
    rng_seed: Option<u64>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RoomRegistry {
    /// With a seed, every room's RNG is derived from `(seed, room id)`.
    pub fn new(rng_seed: Option<u64>) -> Self {
        Self {
            rooms: DashMap::new(),
            next_id: AtomicU64::new(1),
            rng_seed,
        }
    }

    fn room_rng(&self, id: RoomId) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ id.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => StdRng::from_os_rng(),
        }
    }

    /// Create an empty room in the lobby. Never fails: titles are trimmed and
    /// cut to `MAX_TITLE_CHARS`, and blank ones fall back to `Room <id>`.
    pub fn create_room(&self, title: &str) -> RoomId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let title = match title.trim() {
            "" => format!("Room {}", id),
            t => t.chars().take(MAX_TITLE_CHARS).collect::<String>().trim_end().to_string(),
        };

        let handle = RoomHandle {
            id,
            title: title.clone(),
            head_count: AtomicUsize::new(0),
            room: Mutex::new(Room::new(id, title.clone(), self.room_rng(id))),
        };
        self.rooms.insert(id, Arc::new(handle));

        info!(target: "impostor::room", "Created room {} ({:?})", id, title);
        id
    }

    /// Rooms ordered by id, with head counts as last published.
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self.rooms.iter().map(|entry| entry.summary()).collect();
        rooms.sort_by_key(|r| r.room_id);
        rooms
    }

    pub fn find_room(&self, id: RoomId) -> Result<Arc<RoomHandle>> {
        self.rooms
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(GameError::RoomNotFound(id))
    }

    /// Unregister a room. Callers holding the room lock should close it first
    /// so racing joiners see it as gone.
    pub fn remove_room(&self, id: RoomId) -> Option<Arc<RoomHandle>> {
        let removed = self.rooms.remove(&id).map(|(_, handle)| handle);
        if removed.is_some() {
            info!(target: "impostor::room", "Removed room {}", id);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
