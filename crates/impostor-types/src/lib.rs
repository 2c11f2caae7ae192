//! Shared types for the Impostor room coordinator.

mod member;
mod room;
mod ws;

pub use member::*;
pub use room::*;
pub use ws::*;
