use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::types::Feed;

/// A client's subscription information.
pub struct ClientSubscription {
    /// Subscribed feeds.
    pub feeds: HashSet<Feed>,
    /// Channel to send messages to the client.
    pub tx: mpsc::UnboundedSender<String>,
}

/// Manages WebSocket client subscriptions.
pub struct RoomManager {
    /// Client subscriptions keyed by client ID.
    pub clients: DashMap<Uuid, ClientSubscription>,
    /// Feed rooms: feed -> set of client IDs.
    rooms: DashMap<Feed, HashSet<Uuid>>,
}

impl RoomManager {
    /// Create a new room manager.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a new client.
    pub fn register(&self, tx: mpsc::UnboundedSender<String>) -> Uuid {
        let client_id = Uuid::new_v4();
        self.clients.insert(
            client_id,
            ClientSubscription {
                feeds: HashSet::new(),
                tx,
            },
        );
        client_id
    }

    /// Unregister a client and remove it from all rooms.
    pub fn unregister(&self, client_id: Uuid) {
        if let Some((_, subscription)) = self.clients.remove(&client_id) {
            for feed in subscription.feeds {
                if let Some(mut room) = self.rooms.get_mut(&feed) {
                    room.remove(&client_id);
                }
            }
        }
    }

    /// Subscribe a client to feeds. Returns the feeds that were newly added.
    pub fn subscribe(&self, client_id: Uuid, feeds: &[Feed]) -> Vec<Feed> {
        let mut subscribed = Vec::new();

        if let Some(mut client) = self.clients.get_mut(&client_id) {
            for &feed in feeds {
                if client.feeds.insert(feed) {
                    subscribed.push(feed);
                    self.rooms.entry(feed).or_default().insert(client_id);
                }
            }
        }

        subscribed
    }

    /// Unsubscribe a client from feeds. Returns the feeds that were removed.
    pub fn unsubscribe(&self, client_id: Uuid, feeds: &[Feed]) -> Vec<Feed> {
        let mut unsubscribed = Vec::new();

        if let Some(mut client) = self.clients.get_mut(&client_id) {
            for feed in feeds {
                if client.feeds.remove(feed) {
                    unsubscribed.push(*feed);
                    if let Some(mut room) = self.rooms.get_mut(feed) {
                        room.remove(&client_id);
                    }
                }
            }
        }

        unsubscribed
    }

    /// Get all clients subscribed to a feed.
    pub fn get_subscribers(&self, feed: Feed) -> Vec<mpsc::UnboundedSender<String>> {
        let client_ids: Vec<Uuid> = self
            .rooms
            .get(&feed)
            .map(|room| room.iter().copied().collect())
            .unwrap_or_default();

        client_ids
            .iter()
            .filter_map(|id| self.clients.get(id).map(|c| c.tx.clone()))
            .collect()
    }

    /// Broadcast a message to every subscriber of a feed. Returns how many
    /// clients it was handed to.
    pub fn broadcast(&self, feed: Feed, message: &str) -> usize {
        self.get_subscribers(feed)
            .into_iter()
            .filter(|tx| tx.send(message.to_string()).is_ok())
            .count()
    }

    /// Send a message to a single client.
    pub fn send_to(&self, client_id: Uuid, message: String) -> bool {
        self.clients
            .get(&client_id)
            .map(|client| client.tx.send(message).is_ok())
            .unwrap_or(false)
    }

    /// Get the number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Get the number of feeds with at least one subscriber.
    pub fn room_count(&self) -> usize {
        self.rooms.iter().filter(|r| !r.is_empty()).count()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self {
            clients: DashMap::new(),
            rooms: DashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_reports_only_new_feeds() {
        let rooms = RoomManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = rooms.register(tx);

        assert_eq!(rooms.subscribe(id, &[Feed::Quotes, Feed::Chart]), vec![Feed::Quotes, Feed::Chart]);
        assert_eq!(rooms.subscribe(id, &[Feed::Quotes, Feed::Positions]), vec![Feed::Positions]);
        assert_eq!(rooms.room_count(), 3);

        assert_eq!(rooms.unsubscribe(id, &[Feed::Chart, Feed::Chart]), vec![Feed::Chart]);
        assert_eq!(rooms.room_count(), 2);
    }

    #[test]
    fn test_broadcast_reaches_only_subscribers() {
        let rooms = RoomManager::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = rooms.register(tx_a);
        let _b = rooms.register(tx_b);

        rooms.subscribe(a, &[Feed::Quotes]);

        assert_eq!(rooms.broadcast(Feed::Quotes, "tick"), 1);
        assert_eq!(rx_a.try_recv().unwrap(), "tick");
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_unregister_clears_rooms() {
        let rooms = RoomManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = rooms.register(tx);
        rooms.subscribe(id, &Feed::ALL);

        rooms.unregister(id);

        assert_eq!(rooms.client_count(), 0);
        assert_eq!(rooms.room_count(), 0);
        assert_eq!(rooms.broadcast(Feed::Chart, "x"), 0);
        assert!(!rooms.send_to(id, "x".to_string()));
    }
}
