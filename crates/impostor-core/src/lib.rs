//! Room session coordination for Impostor.

mod assignment;
mod coordinator;
mod corpus;
mod error;
mod registry;
mod room;
mod transport;
mod voting;

pub use assignment::{assign_words, WordAssignment};
pub use coordinator::{CoordinatorConfig, SessionCoordinator};
pub use corpus::{CorpusError, WordCorpus};
pub use error::GameError;
pub use registry::{RoomHandle, RoomRegistry, MAX_TITLE_CHARS};
pub use room::{JoinOutcome, LeaveOutcome, Resolution, Room, VoteOutcome};
pub use transport::{RecordingTransport, Recipient, Transport};
pub use voting::{resolve_winner, VoteRound};

/// Result type for room operations.
pub type Result<T> = std::result::Result<T, GameError>;
