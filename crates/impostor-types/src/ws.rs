//! WebSocket message protocol between client and server.

use serde::{Deserialize, Serialize};

use crate::{ConnectionId, ErrorKind, LobbyUser, RoomId, RoomSummary, RosterEntry, VoteTally};

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsClientMessage {
    /// Register (or rename) this connection in the lobby.
    Join { display_name: String },
    /// Create a new, empty room.
    CreateRoom { title: String },
    /// Take a seat in a room.
    JoinRoom { room_id: RoomId },
    /// Leave the room this connection is seated in.
    LeaveRoom { room_id: RoomId },
    /// Host only: open the category vote.
    StartGame { room_id: RoomId },
    /// Ask again for the categories offered in the current vote.
    RequestCategories { room_id: RoomId },
    /// Cast this member's vote for a category.
    Vote { room_id: RoomId, category: String },
    /// Ask for this member's secret word once the category is resolved.
    RequestWord { room_id: RoomId },
    /// Host only: return an assigned room to the lobby for a new round.
    ResetGame { room_id: RoomId },
    /// Ask for the current room list.
    ListRooms,
}

impl WsClientMessage {
    /// Short action name for logging and error reporting.
    pub fn action(&self) -> &'static str {
        match self {
            WsClientMessage::Join { .. } => "join",
            WsClientMessage::CreateRoom { .. } => "create_room",
            WsClientMessage::JoinRoom { .. } => "join_room",
            WsClientMessage::LeaveRoom { .. } => "leave_room",
            WsClientMessage::StartGame { .. } => "start_game",
            WsClientMessage::RequestCategories { .. } => "request_categories",
            WsClientMessage::Vote { .. } => "vote",
            WsClientMessage::RequestWord { .. } => "request_word",
            WsClientMessage::ResetGame { .. } => "reset_game",
            WsClientMessage::ListRooms => "list_rooms",
        }
    }
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// First message on a new connection.
    Welcome { connection_id: ConnectionId },
    /// Lobby registration accepted.
    Registered { display_name: String },
    /// Registered lobby users changed.
    LobbyUpdated { users: Vec<LobbyUser> },
    /// A room was created on this connection's request.
    RoomCreated { room_id: RoomId },
    /// Room existence or head counts changed.
    RoomListUpdated { rooms: Vec<RoomSummary> },
    /// A room's roster changed (join, leave, host change).
    RosterUpdated {
        room_id: RoomId,
        members: Vec<RosterEntry>,
    },
    /// This connection gained or lost host rights.
    HostStatus { is_host: bool },
    /// The room moved from lobby to voting.
    GameStarted { room_id: RoomId },
    /// Categories that may be voted for in this round.
    CategoriesOffered { categories: Vec<String> },
    /// Vote tally after a vote (or a retracted vote).
    TallyUpdated { room_id: RoomId, tally: VoteTally },
    /// Voting is over; words are ready to be requested.
    CategoryResolved { room_id: RoomId, category: String },
    /// This member's secret word.
    WordAssigned { word: String },
    /// The room returned to the lobby for a new round.
    GameReset { room_id: RoomId },
    /// The last action from this connection was rejected.
    Error {
        kind: ErrorKind,
        code: String,
        message: String,
    },
}

#[cfg(test)]
mod serialization_tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_client_vote_deserialization() {
        let raw = json!({"type": "vote", "room_id": 3, "category": "Animals"});
        let msg: WsClientMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(
            msg,
            WsClientMessage::Vote {
                room_id: 3,
                category: "Animals".to_string()
            }
        );
        assert_eq!(msg.action(), "vote");
    }

    #[test]
    fn test_client_unit_variant_deserialization() {
        let msg: WsClientMessage = serde_json::from_str(r#"{"type":"list_rooms"}"#).unwrap();
        assert_eq!(msg, WsClientMessage::ListRooms);
    }

    #[test]
    fn test_client_unknown_type_rejected() {
        let result = serde_json::from_str::<WsClientMessage>(r#"{"type":"select_category"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_room_list_serialization() {
        let msg = WsServerMessage::RoomListUpdated {
            rooms: vec![RoomSummary {
                room_id: 1,
                title: "Trivia Night".to_string(),
                head_count: 2,
            }],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"room_list_updated""#));
        assert!(json.contains(r#""head_count":2"#));
    }

    #[test]
    fn test_roster_serialization() {
        let msg = WsServerMessage::RosterUpdated {
            room_id: 7,
            members: vec![RosterEntry {
                member_id: Uuid::nil(),
                display_name: "alice".to_string(),
                is_host: true,
            }],
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "roster_updated");
        assert_eq!(value["members"][0]["is_host"], true);
    }

    #[test]
    fn test_error_serialization() {
        let msg = WsServerMessage::Error {
            kind: ErrorKind::StateConflict,
            code: "already_voted".to_string(),
            message: "Member has already voted".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"error""#));
        assert!(json.contains(r#""kind":"state_conflict""#));
    }

    #[test]
    fn test_tally_serialization_is_ordered() {
        let mut tally = VoteTally::new();
        tally.insert("Fruits".to_string(), 1);
        tally.insert("Animals".to_string(), 2);
        let msg = WsServerMessage::TallyUpdated { room_id: 1, tally };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""tally":{"Animals":2,"Fruits":1}"#));
    }
}
