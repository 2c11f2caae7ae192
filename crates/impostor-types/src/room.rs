//! Room projections and lifecycle state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{ConnectionId, Member};

/// Monotonically assigned room identifier.
pub type RoomId = u64;

/// Category name → number of votes cast for it in the current round.
pub type VoteTally = BTreeMap<String, u32>;

/// Room lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Members may join and leave; the host may start a game.
    Lobby,
    /// Category vote is open; joins are closed.
    Voting,
    /// Words have been dealt for this round.
    Assigned,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Lobby => "lobby",
            RoomStatus::Voting => "voting",
            RoomStatus::Assigned => "assigned",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary view of a room for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub title: String,
    pub head_count: usize,
}

/// One line of a room roster as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub member_id: ConnectionId,
    pub display_name: String,
    pub is_host: bool,
}

impl From<&Member> for RosterEntry {
    fn from(m: &Member) -> Self {
        Self {
            member_id: m.id,
            display_name: m.display_name.clone(),
            is_host: m.is_host,
        }
    }
}

/// Read-only snapshot of a room's full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub title: String,
    pub status: RoomStatus,
    pub members: Vec<Member>,
    /// Current (or final) tally; empty in the lobby.
    pub tally: VoteTally,
    /// Members that have voted in the current round.
    pub voted: Vec<ConnectionId>,
    /// The resolved category once words are assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RoomSnapshot {
    pub fn host(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_host)
    }
}

/// Broad classification of a rejected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input: unknown room or member, duplicate name, invalid category.
    Validation,
    /// Action issued in the wrong state or by the wrong member.
    StateConflict,
    /// Word corpus cannot satisfy the request.
    Data,
}
