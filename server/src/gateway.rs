use crate::registry::ConnectionId;
use roulette_protocol::ServerToClient;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::warn;

/// Per-connection queue drained by that connection's socket writer.
pub type Outbox = mpsc::UnboundedSender<ServerToClient>;

/// Fan-out to every attached connection. Best effort: a closed outbox just
/// misses the event. Order is preserved per connection only.
#[derive(Debug, Default)]
pub struct Gateway {
    outboxes: HashMap<ConnectionId, Outbox>,
}

impl Gateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, id: ConnectionId, outbox: Outbox) {
        self.outboxes.insert(id, outbox);
    }

    pub fn detach(&mut self, id: ConnectionId) -> bool {
        self.outboxes.remove(&id).is_some()
    }

    pub fn unicast(&self, id: ConnectionId, msg: ServerToClient) -> bool {
        match self.outboxes.get(&id) {
            Some(tx) => {
                let event = msg.name();
                let ok = tx.send(msg).is_ok();
                if !ok {
                    warn!(conn = %short(id), event, "unicast to closed outbox");
                }
                ok
            }
            None => false,
        }
    }

    /// Returns how many outboxes accepted the event.
    pub fn broadcast_all(&self, msg: ServerToClient) -> usize {
        let event = msg.name();
        let mut delivered = 0;
        for (id, tx) in self.outboxes.iter() {
            if tx.send(msg.clone()).is_err() {
                warn!(conn = %short(*id), event, "broadcast to closed outbox");
            } else {
                delivered += 1;
            }
        }
        delivered
    }
}

/// First eight characters of an id, for log lines.
pub(crate) fn short(id: ConnectionId) -> String {
    id.to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn unicast_reaches_only_target() {
        let mut gw = Gateway::new();
        let (a_tx, mut a_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        let a = Uuid::new_v4();
        gw.attach(a, a_tx);
        gw.attach(Uuid::new_v4(), b_tx);

        assert!(gw.unicast(a, ServerToClient::AdminAssigned(true)));
        assert_eq!(a_rx.try_recv().unwrap(), ServerToClient::AdminAssigned(true));
        assert!(b_rx.try_recv().is_err());
    }

    #[test]
    fn broadcast_reaches_everyone_in_send_order() {
        let mut gw = Gateway::new();
        let mut rxs = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::unbounded_channel();
            gw.attach(Uuid::new_v4(), tx);
            rxs.push(rx);
        }

        assert_eq!(gw.broadcast_all(ServerToClient::UsersUpdate(3)), 3);
        assert_eq!(gw.broadcast_all(ServerToClient::UsersUpdate(2)), 3);
        for rx in rxs.iter_mut() {
            assert_eq!(rx.try_recv().unwrap(), ServerToClient::UsersUpdate(3));
            assert_eq!(rx.try_recv().unwrap(), ServerToClient::UsersUpdate(2));
        }
    }

    #[test]
    fn closed_outbox_is_skipped() {
        let mut gw = Gateway::new();
        let (live_tx, mut live_rx) = mpsc::unbounded_channel();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        drop(dead_rx);
        let dead = Uuid::new_v4();
        gw.attach(Uuid::new_v4(), live_tx);
        gw.attach(dead, dead_tx);

        assert_eq!(gw.broadcast_all(ServerToClient::UsersUpdate(2)), 1);
        assert!(!gw.unicast(dead, ServerToClient::UsersUpdate(2)));
        assert!(live_rx.try_recv().is_ok());
    }

    #[test]
    fn detached_connection_gets_nothing() {
        let mut gw = Gateway::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let a = Uuid::new_v4();
        gw.attach(a, tx);
        assert!(gw.detach(a));
        assert!(!gw.detach(a));
        assert_eq!(gw.broadcast_all(ServerToClient::UsersUpdate(0)), 0);
        assert!(rx.try_recv().is_err());
    }
}
