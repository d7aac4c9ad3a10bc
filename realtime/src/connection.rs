use crate::message::Channel;
use axum::extract::ws::Message as Frame;
use dashmap::DashMap;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

/// Outbound queue of one live WebSocket connection. The connection task owns the
/// receiving end and is the only writer to the socket.
pub type Subscriber = UnboundedSender<Frame>;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub channel: Channel,
    pub sender: Subscriber,
}

/// Connection registry with dual indices: by connection for registration/cleanup and
/// by channel for fan-out.
///
/// A connection belongs to exactly one channel for its whole lifetime.
pub struct ConnectionRegistry {
    /// Primary storage: lookup by connection_id for registration/cleanup - O(1)
    connections: DashMap<ConnectionId, ConnectionInfo>,

    /// Secondary index: the live connections of each channel
    channel_index: DashMap<Channel, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            channel_index: DashMap::new(),
        }
    }

    /// Register a new connection - O(1)
    pub fn register(&self, channel: Channel, sender: Subscriber) -> ConnectionId {
        let connection_id = ConnectionId::new();

        self.connections
            .insert(connection_id.clone(), ConnectionInfo { channel, sender });

        self.channel_index
            .entry(channel)
            .or_default()
            .insert(connection_id.clone());

        connection_id
    }

    /// Unregister a connection - O(1). Returns false when it was already gone.
    pub fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let Some((_, info)) = self.connections.remove(connection_id) else {
            return false;
        };

        if let Some(mut entry) = self.channel_index.get_mut(&info.channel) {
            entry.remove(connection_id);

            if entry.is_empty() {
                drop(entry); // Release lock before removal
                self.channel_index
                    .remove_if(&info.channel, |_, ids| ids.is_empty());
            }
        }

        true
    }

    /// The subscribers of `channel` at this instant.
    ///
    /// The returned handles stay usable after the connection unregisters; sending to
    /// one then simply fails.
    pub fn snapshot(&self, channel: Channel) -> Vec<(ConnectionId, Subscriber)> {
        // Copy the ids out first so no shard lock of the index is held while the
        // primary map is read.
        let ids: Vec<ConnectionId> = match self.channel_index.get(&channel) {
            Some(ids) => ids.iter().cloned().collect(),
            None => return Vec::new(),
        };

        ids.into_iter()
            .filter_map(|id| {
                let sender = self.connections.get(&id)?.sender.clone();
                Some((id, sender))
            })
            .collect()
    }

    pub fn count(&self, channel: Channel) -> usize {
        self.channel_index
            .get(&channel)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    /// True when no connection on any channel is registered.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
