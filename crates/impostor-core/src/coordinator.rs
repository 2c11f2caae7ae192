//! Session coordinator: routes participant actions to rooms and emits notifications.

use crate::{GameError, Resolution, Result, Room, RoomRegistry, Transport, WordCorpus};
use dashmap::DashMap;
use impostor_types::{
    ConnectionId, LobbyUser, RoomId, RoomSnapshot, RoomSummary, RosterEntry, WsClientMessage,
    WsServerMessage,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Longest accepted display name, in characters.
const MAX_DISPLAY_NAME_CHARS: usize = 32;

/// Configuration for the session coordinator.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    /// Seed for deterministic tie-breaks and word dealing.
    pub rng_seed: Option<u64>,
}

/// Per-connection lobby state.
#[derive(Debug, Clone, Default)]
struct Connection {
    display_name: Option<String>,
    room: Option<RoomId>,
}

/// Owns all rooms and connections for the process.
///
/// Every room mutation happens under that room's lock, and notifications for
/// it are handed to the transport before the lock is released so members see
/// them in mutation order.
pub struct SessionCoordinator {
    registry: RoomRegistry,
    corpus: Arc<WordCorpus>,
    categories: Vec<String>,
    transport: Arc<dyn Transport>,
    connections: DashMap<ConnectionId, Connection>,
}

impl SessionCoordinator {
    pub fn new(config: CoordinatorConfig, corpus: Arc<WordCorpus>, transport: Arc<dyn Transport>) -> Self {
        let categories = corpus.playable_categories();
        Self {
            registry: RoomRegistry::new(config.rng_seed),
            corpus,
            categories,
            transport,
            connections: DashMap::new(),
        }
    }

    /// Categories offered whenever a vote opens.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.registry.list_rooms()
    }

    pub async fn room_snapshot(&self, room_id: RoomId) -> Result<RoomSnapshot> {
        let handle = self.registry.find_room(room_id)?;
        let room = handle.lock().await;
        Ok(room.snapshot())
    }

    /// Registered lobby users, ordered by name.
    pub fn lobby_users(&self) -> Vec<LobbyUser> {
        let mut users: Vec<LobbyUser> = self
            .connections
            .iter()
            .filter_map(|entry| {
                entry.display_name.as_ref().map(|name| LobbyUser {
                    connection_id: *entry.key(),
                    display_name: name.clone(),
                })
            })
            .collect();
        users.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then(a.connection_id.cmp(&b.connection_id))
        });
        users
    }

    /// A new transport connection arrived.
    pub fn connect(&self, connection: ConnectionId) {
        self.connections.insert(connection, Connection::default());
        self.transport
            .unicast(connection, WsServerMessage::Welcome { connection_id: connection });
        self.transport.unicast(
            connection,
            WsServerMessage::RoomListUpdated { rooms: self.list_rooms() },
        );
        debug!(target: "impostor::ws", "Connection {} opened", connection);
    }

    /// The transport lost a connection. Equivalent to leaving its room.
    pub async fn disconnect(&self, connection: ConnectionId) {
        let Some((_, state)) = self.connections.remove(&connection) else {
            return;
        };

        if let Some(room_id) = state.room {
            if let Err(e) = self.leave_seat(connection, room_id, false).await {
                debug!(target: "impostor::room", "Disconnect of {} from room {}: {}", connection, room_id, e);
            }
        }
        if state.display_name.is_some() {
            self.broadcast_lobby();
        }
        debug!(target: "impostor::ws", "Connection {} closed", connection);
    }

    /// Apply one inbound action. A rejection is reported to the acting
    /// connection as an `error` message and returned.
    pub async fn handle(&self, connection: ConnectionId, message: WsClientMessage) -> Result<()> {
        let action = message.action();
        let result = match message {
            WsClientMessage::Join { display_name } => self.register(connection, &display_name),
            WsClientMessage::CreateRoom { title } => {
                let room_id = self.create_room(&title);
                self.transport
                    .unicast(connection, WsServerMessage::RoomCreated { room_id });
                Ok(())
            }
            WsClientMessage::JoinRoom { room_id } => self.join_room(connection, room_id).await,
            WsClientMessage::LeaveRoom { room_id } => self.leave_room(connection, room_id).await,
            WsClientMessage::StartGame { room_id } => self.start_game(connection, room_id).await,
            WsClientMessage::RequestCategories { room_id } => {
                self.request_categories(connection, room_id).await
            }
            WsClientMessage::Vote { room_id, category } => {
                self.vote(connection, room_id, &category).await
            }
            WsClientMessage::RequestWord { room_id } => self.request_word(connection, room_id).await,
            WsClientMessage::ResetGame { room_id } => self.reset_game(connection, room_id).await,
            WsClientMessage::ListRooms => {
                self.transport.unicast(
                    connection,
                    WsServerMessage::RoomListUpdated { rooms: self.list_rooms() },
                );
                Ok(())
            }
        };

        if let Err(e) = &result {
            debug!(target: "impostor::room", "Rejected {} from {}: {}", action, connection, e);
            self.transport.unicast(connection, error_message(e));
        }
        result
    }

    /// Set or change a connection's display name while it is not seated.
    pub fn register(&self, connection: ConnectionId, display_name: &str) -> Result<()> {
        let name = display_name.trim();
        if name.is_empty() || name.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(GameError::InvalidDisplayName(display_name.to_string()));
        }

        {
            let mut state = self.connections.entry(connection).or_default();
            if let Some(room_id) = state.room {
                return Err(GameError::AlreadyInRoom(room_id));
            }
            state.display_name = Some(name.to_string());
        }

        info!(target: "impostor::room", "Connection {} registered as {:?}", connection, name);
        self.transport.unicast(
            connection,
            WsServerMessage::Registered { display_name: name.to_string() },
        );
        self.broadcast_lobby();
        Ok(())
    }

    pub fn create_room(&self, title: &str) -> RoomId {
        let room_id = self.registry.create_room(title);
        self.broadcast_room_list();
        room_id
    }

    pub async fn join_room(&self, connection: ConnectionId, room_id: RoomId) -> Result<()> {
        let display_name = {
            let state = self.connections.get(&connection).ok_or(GameError::NotRegistered)?;
            if let Some(current) = state.room {
                return Err(GameError::AlreadyInRoom(current));
            }
            state.display_name.clone().ok_or(GameError::NotRegistered)?
        };

        let handle = self.registry.find_room(room_id)?;
        let mut room = handle.lock().await;
        let outcome = room.join(connection, &display_name)?;
        handle.publish_head_count(&room);
        if let Some(mut state) = self.connections.get_mut(&connection) {
            state.room = Some(room_id);
        }

        self.send_roster(&room);
        if outcome.member.is_host {
            self.transport
                .unicast(connection, WsServerMessage::HostStatus { is_host: true });
        }
        self.broadcast_room_list();
        Ok(())
    }

    pub async fn leave_room(&self, connection: ConnectionId, room_id: RoomId) -> Result<()> {
        self.require_seat(connection, room_id)?;
        self.leave_seat(connection, room_id, true).await
    }

    async fn leave_seat(&self, connection: ConnectionId, room_id: RoomId, notify_leaver: bool) -> Result<()> {
        let handle = self.registry.find_room(room_id)?;
        let mut room = handle.lock().await;
        let outcome = room.leave(connection, &self.corpus)?;
        handle.publish_head_count(&room);
        if let Some(mut state) = self.connections.get_mut(&connection) {
            state.room = None;
        }

        if notify_leaver && outcome.member.is_host {
            self.transport
                .unicast(connection, WsServerMessage::HostStatus { is_host: false });
        }

        if room.is_empty() {
            room.close();
            self.registry.remove_room(room_id);
        } else {
            self.send_roster(&room);
            if let Some(new_host) = outcome.new_host {
                info!(target: "impostor::room", "Room {}: host passed to {}", room_id, new_host);
                self.transport
                    .unicast(new_host, WsServerMessage::HostStatus { is_host: true });
            }
            if outcome.vote_retracted {
                self.broadcast_to(
                    &room,
                    WsServerMessage::TallyUpdated { room_id, tally: room.tally() },
                );
            }
            if let Some(resolution) = outcome.resolution {
                self.announce_resolution(&room, resolution);
            }
        }

        self.broadcast_room_list();
        Ok(())
    }

    pub async fn start_game(&self, connection: ConnectionId, room_id: RoomId) -> Result<()> {
        self.require_seat(connection, room_id)?;
        let handle = self.registry.find_room(room_id)?;
        let mut room = handle.lock().await;
        let categories = room.start_game(connection, self.categories.clone())?;

        self.broadcast_to(&room, WsServerMessage::GameStarted { room_id });
        self.broadcast_to(&room, WsServerMessage::CategoriesOffered { categories });
        Ok(())
    }

    pub async fn request_categories(&self, connection: ConnectionId, room_id: RoomId) -> Result<()> {
        self.require_seat(connection, room_id)?;
        let handle = self.registry.find_room(room_id)?;
        let room = handle.lock().await;
        let categories = room.offered_categories(connection)?.to_vec();

        self.transport
            .unicast(connection, WsServerMessage::CategoriesOffered { categories });
        Ok(())
    }

    pub async fn vote(&self, connection: ConnectionId, room_id: RoomId, category: &str) -> Result<()> {
        self.require_seat(connection, room_id)?;
        let handle = self.registry.find_room(room_id)?;
        let mut room = handle.lock().await;
        let outcome = room.vote(connection, category, &self.corpus)?;

        self.broadcast_to(
            &room,
            WsServerMessage::TallyUpdated { room_id, tally: outcome.tally },
        );
        if let Some(resolution) = outcome.resolution {
            self.announce_resolution(&room, resolution);
        }
        Ok(())
    }

    pub async fn request_word(&self, connection: ConnectionId, room_id: RoomId) -> Result<()> {
        self.require_seat(connection, room_id)?;
        let handle = self.registry.find_room(room_id)?;
        let room = handle.lock().await;
        let word = room.word_for(connection)?.to_string();

        self.transport
            .unicast(connection, WsServerMessage::WordAssigned { word });
        Ok(())
    }

    pub async fn reset_game(&self, connection: ConnectionId, room_id: RoomId) -> Result<()> {
        self.require_seat(connection, room_id)?;
        let handle = self.registry.find_room(room_id)?;
        let mut room = handle.lock().await;
        room.reset(connection)?;

        self.broadcast_to(&room, WsServerMessage::GameReset { room_id });
        Ok(())
    }

    fn require_seat(&self, connection: ConnectionId, room_id: RoomId) -> Result<()> {
        let seated = self
            .connections
            .get(&connection)
            .and_then(|state| state.room);
        if seated == Some(room_id) {
            return Ok(());
        }
        // Report a missing room before a missing seat.
        self.registry.find_room(room_id)?;
        Err(GameError::NotInRoom(room_id))
    }

    fn announce_resolution(&self, room: &Room, resolution: Resolution) {
        match resolution {
            Resolution::Assigned { category } => {
                self.broadcast_to(
                    room,
                    WsServerMessage::CategoryResolved { room_id: room.id(), category },
                );
            }
            Resolution::Aborted { error, .. } => {
                self.broadcast_to(room, error_message(&error));
                self.broadcast_to(room, WsServerMessage::GameReset { room_id: room.id() });
            }
        }
    }

    fn send_roster(&self, room: &Room) {
        let members = room.members().iter().map(RosterEntry::from).collect();
        self.broadcast_to(
            room,
            WsServerMessage::RosterUpdated { room_id: room.id(), members },
        );
    }

    fn broadcast_to(&self, room: &Room, message: WsServerMessage) {
        let members: Vec<ConnectionId> = room.members().iter().map(|m| m.id).collect();
        self.transport.broadcast(room.id(), &members, message);
    }

    fn broadcast_room_list(&self) {
        self.transport
            .broadcast_all(WsServerMessage::RoomListUpdated { rooms: self.list_rooms() });
    }

    fn broadcast_lobby(&self) {
        self.transport
            .broadcast_all(WsServerMessage::LobbyUpdated { users: self.lobby_users() });
    }
}

fn error_message(error: &GameError) -> WsServerMessage {
    WsServerMessage::Error {
        kind: error.kind(),
        code: error.code().to_string(),
        message: error.to_string(),
    }
}
