//! Outbound delivery seam between the coordinator and the wire.

use impostor_types::{ConnectionId, RoomId, WsServerMessage};
use std::sync::Mutex;

/// Delivers notifications to connections.
///
/// Implementations must not block: the coordinator calls these while holding
/// a room lock. Delivery is fire-and-forget.
pub trait Transport: Send + Sync {
    /// Send to one connection.
    fn unicast(&self, to: ConnectionId, message: WsServerMessage);

    /// Send to every member of a room.
    fn broadcast(&self, room_id: RoomId, members: &[ConnectionId], message: WsServerMessage) {
        let _ = room_id;
        for member in members {
            self.unicast(*member, message.clone());
        }
    }

    /// Send to every live connection.
    fn broadcast_all(&self, message: WsServerMessage);
}

/// Who a recorded message was addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Connection(ConnectionId),
    Room(RoomId, Vec<ConnectionId>),
    Everyone,
}

/// In-memory transport that records every message, for tests and embedding.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(Recipient, WsServerMessage)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<(Recipient, WsServerMessage)> {
        match self.sent.lock() {
            Ok(mut sent) => std::mem::take(&mut *sent),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Messages that reached `connection`, directly or through a broadcast.
    pub fn received_by(&self, connection: ConnectionId) -> Vec<WsServerMessage> {
        let sent = match self.sent.lock() {
            Ok(sent) => sent,
            Err(poisoned) => poisoned.into_inner(),
        };
        sent.iter()
            .filter(|(to, _)| match to {
                Recipient::Connection(id) => *id == connection,
                Recipient::Room(_, members) => members.contains(&connection),
                Recipient::Everyone => true,
            })
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    fn record(&self, to: Recipient, message: WsServerMessage) {
        match self.sent.lock() {
            Ok(mut sent) => sent.push((to, message)),
            Err(poisoned) => poisoned.into_inner().push((to, message)),
        }
    }
}

impl Transport for RecordingTransport {
    fn unicast(&self, to: ConnectionId, message: WsServerMessage) {
        self.record(Recipient::Connection(to), message);
    }

    fn broadcast(&self, room_id: RoomId, members: &[ConnectionId], message: WsServerMessage) {
        self.record(Recipient::Room(room_id, members.to_vec()), message);
    }

    fn broadcast_all(&self, message: WsServerMessage) {
        self.record(Recipient::Everyone, message);
    }
}
