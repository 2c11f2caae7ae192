//! Registry of live WebSocket connections; the coordinator's outbound transport.

use dashmap::DashMap;
use impostor_core::Transport;
use impostor_types::{ConnectionId, RoomId, WsServerMessage};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{trace, warn};

/// Fans server messages out to per-connection queues.
///
/// Every connection owns a bounded queue drained by its socket task. Sends
/// never wait: a full or closed queue drops the message with a warning.
pub struct ConnectionHub {
    senders: DashMap<ConnectionId, mpsc::Sender<WsServerMessage>>,
    buffer: usize,
}

impl ConnectionHub {
    pub fn new(buffer: usize) -> Self {
        Self {
            senders: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Register a connection and return the receiving end of its queue.
    pub fn register(&self, connection: ConnectionId) -> mpsc::Receiver<WsServerMessage> {
        let (tx, rx) = mpsc::channel(self.buffer);
        self.senders.insert(connection, tx);
        rx
    }

    pub fn unregister(&self, connection: ConnectionId) {
        self.senders.remove(&connection);
    }

    pub fn is_connected(&self, connection: ConnectionId) -> bool {
        self.senders.contains_key(&connection)
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    fn deliver(&self, to: ConnectionId, sender: &mpsc::Sender<WsServerMessage>, message: WsServerMessage) {
        match sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: "impostor::transport", "Outbound queue full for {}, dropping message", to);
            }
            Err(TrySendError::Closed(_)) => {
                trace!(target: "impostor::transport", "Connection {} already closed", to);
            }
        }
    }
}

impl Transport for ConnectionHub {
    fn unicast(&self, to: ConnectionId, message: WsServerMessage) {
        // Clone the sender so no map guard outlives this call.
        let sender = self.senders.get(&to).map(|entry| entry.value().clone());
        match sender {
            Some(sender) => self.deliver(to, &sender, message),
            None => trace!(target: "impostor::transport", "No live connection {}", to),
        }
    }

    fn broadcast(&self, room_id: RoomId, members: &[ConnectionId], message: WsServerMessage) {
        trace!(target: "impostor::transport", "Room {}: broadcasting to {} members", room_id, members.len());
        for member in members {
            self.unicast(*member, message.clone());
        }
    }

    fn broadcast_all(&self, message: WsServerMessage) {
        let targets: Vec<_> = self
            .senders
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        for (to, sender) in targets {
            self.deliver(to, &sender, message.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_unicast_reaches_only_target() {
        let hub = ConnectionHub::new(8);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = hub.register(a);
        let mut rx_b = hub.register(b);

        hub.unicast(a, WsServerMessage::GameReset { room_id: 1 });

        assert_eq!(rx_a.recv().await, Some(WsServerMessage::GameReset { room_id: 1 }));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_all() {
        let hub = ConnectionHub::new(8);
        let mut receivers: Vec<_> = (0..3).map(|_| hub.register(Uuid::new_v4())).collect();

        hub.broadcast_all(WsServerMessage::RoomListUpdated { rooms: vec![] });

        for rx in &mut receivers {
            assert_eq!(
                rx.recv().await,
                Some(WsServerMessage::RoomListUpdated { rooms: vec![] })
            );
        }
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let hub = ConnectionHub::new(1);
        let id = Uuid::new_v4();
        let mut rx = hub.register(id);

        hub.unicast(id, WsServerMessage::GameReset { room_id: 1 });
        hub.unicast(id, WsServerMessage::GameReset { room_id: 2 });

        assert_eq!(rx.try_recv().ok(), Some(WsServerMessage::GameReset { room_id: 1 }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unregistered_connection_is_ignored() {
        let hub = ConnectionHub::new(4);
        let id = Uuid::new_v4();
        let rx = hub.register(id);
        drop(rx);
        hub.unicast(id, WsServerMessage::GameReset { room_id: 1 });

        hub.unregister(id);
        assert!(!hub.is_connected(id));
        hub.unicast(id, WsServerMessage::GameReset { room_id: 1 });
        assert!(hub.is_empty());
    }
}
