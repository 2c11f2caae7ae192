//! Participant types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of one live transport connection.
///
/// A connection's id doubles as its member id once it is seated in a room.
pub type ConnectionId = Uuid;

/// A participant seated in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Connection this member is bound to.
    pub id: ConnectionId,
    /// Display name, unique within the room.
    pub display_name: String,
    /// Whether this member currently holds host rights.
    pub is_host: bool,
}

impl Member {
    pub fn new(id: ConnectionId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_host: false,
        }
    }
}

/// A registered connection as shown in the lobby user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyUser {
    pub connection_id: ConnectionId,
    pub display_name: String,
}
