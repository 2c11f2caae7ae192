//! Error types for Impostor.

use impostor_types::{ConnectionId, ErrorKind, RoomId, RoomStatus};
use thiserror::Error;

/// A rejected room action. Every variant leaves room state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid display name: {0}")]
    InvalidDisplayName(String),

    #[error("Connection has not joined the lobby yet")]
    NotRegistered,

    #[error("Display name already taken in room {room_id}: {name}")]
    DuplicateName { room_id: RoomId, name: String },

    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Unknown member: {0}")]
    UnknownMember(ConnectionId),

    #[error("Not seated in room {0}")]
    NotInRoom(RoomId),

    #[error("Category not offered in this round: {0}")]
    InvalidCategory(String),

    #[error("Only the host may {0}")]
    Unauthorized(&'static str),

    #[error("Cannot {action} while room is {actual} (expected {expected})")]
    InvalidStateTransition {
        action: &'static str,
        expected: RoomStatus,
        actual: RoomStatus,
    },

    #[error("Member has already voted in this round")]
    AlreadyVoted,

    #[error("Already seated in room {0}")]
    AlreadyInRoom(RoomId),

    #[error("Words have not been assigned yet")]
    NotAssigned,

    #[error("Category {0} needs at least 2 distinct words")]
    InsufficientWords(String),

    #[error("No playable categories available")]
    NoCategories,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidDisplayName(_)
            | GameError::NotRegistered
            | GameError::DuplicateName { .. }
            | GameError::RoomNotFound(_)
            | GameError::UnknownMember(_)
            | GameError::NotInRoom(_)
            | GameError::InvalidCategory(_) => ErrorKind::Validation,
            GameError::Unauthorized(_)
            | GameError::InvalidStateTransition { .. }
            | GameError::AlreadyVoted
            | GameError::AlreadyInRoom(_)
            | GameError::NotAssigned => ErrorKind::StateConflict,
            GameError::InsufficientWords(_) | GameError::NoCategories => ErrorKind::Data,
        }
    }

    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidDisplayName(_) => "invalid_display_name",
            GameError::NotRegistered => "not_registered",
            GameError::DuplicateName { .. } => "duplicate_name",
            GameError::RoomNotFound(_) => "room_not_found",
            GameError::UnknownMember(_) => "unknown_member",
            GameError::NotInRoom(_) => "not_in_room",
            GameError::InvalidCategory(_) => "invalid_category",
            GameError::Unauthorized(_) => "unauthorized",
            GameError::InvalidStateTransition { .. } => "invalid_state_transition",
            GameError::AlreadyVoted => "already_voted",
            GameError::AlreadyInRoom(_) => "already_in_room",
            GameError::NotAssigned => "not_assigned",
            GameError::InsufficientWords(_) => "insufficient_words",
            GameError::NoCategories => "no_categories",
        }
    }
}
