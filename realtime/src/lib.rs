//! Real-time statistics broadcast over WebSockets.
//!
//! # Architecture
//!
//! - **Channels**: `dogs`, `cats` and `status`. Every connection subscribes to exactly
//!   one channel; a client that wants two channels opens two connections.
//! - **Dual-index registry**: O(1) registration and cleanup by connection id, plus a
//!   per-channel index for fan-out, both on `DashMap`.
//! - **Server status**: one shared `StatusState` behind a mutex. Every broadcast records
//!   activity, and every stats broadcast is followed by a `server_status` broadcast.
//! - **Best-effort fan-out**: a message is serialized once and queued to each
//!   subscriber. A closed subscriber is logged and skipped; the connection's own
//!   receive loop is what removes it.
//!
//! # Message Flow
//!
//! 1. A dog or cat is created, updated or deleted and the domain layer emits a
//!    `DomainEvent` through its `EventSender`
//! 2. The broadcast worker hands the event to `StatsBroadcastHandler`
//! 3. The handler recomputes the four counters for that animal kind
//! 4. `Broadcaster::publish` queues the stats to every subscriber of the kind's channel
//!    and then the refreshed server status to every `status` subscriber
//! 5. Each connection task drains its queue onto its socket
//!
//! A new connection registers first, then receives a freshly computed snapshot
//! directly, then joins the broadcast stream.
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and the per-connection `Subscriber` queue
//! - `status`: shared server status
//! - `broadcaster`: channel fan-out with the status cascade
//! - `stats`: counting repository seam and aggregation
//! - `message`: wire messages and channels
//! - `domain_event_handler`: glue from domain events to broadcasts

pub mod broadcaster;
pub mod connection;
pub mod domain_event_handler;
pub mod message;
pub mod stats;
pub mod status;

pub use broadcaster::{Broadcaster, PublishReport};
pub use connection::{ConnectionId, ConnectionRegistry, Subscriber};
pub use domain_event_handler::StatsBroadcastHandler;
pub use message::{AggregateStats, Channel, Message};
pub use stats::{compute_stats, StatsRepository};
pub use status::{RunState, ServerStatus, StatusState};
