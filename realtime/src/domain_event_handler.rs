use crate::broadcaster::Broadcaster;
use crate::message::{Channel, Message};
use crate::stats::{compute_stats, StatsRepository};
use async_trait::async_trait;
use events::{DomainEvent, EventHandler, HandlerError};
use log::*;
use std::sync::Arc;

/// Handles domain events by recomputing the statistics of the affected animal kind
/// and broadcasting them on that kind's channel.
///
/// Registered on the broadcast worker's `EventPublisher`, so handling happens strictly
/// in emission order and always after the triggering mutation was committed.
pub struct StatsBroadcastHandler {
    repository: Arc<dyn StatsRepository>,
    broadcaster: Arc<Broadcaster>,
}

impl StatsBroadcastHandler {
    pub fn new(repository: Arc<dyn StatsRepository>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }
}

#[async_trait]
impl EventHandler for StatsBroadcastHandler {
    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        let kind = event.kind();
        debug!(
            "Handling {event:?}: recomputing {kind} stats for {}",
            event.animal_id()
        );

        let stats = compute_stats(self.repository.as_ref(), kind).await?;
        if !stats.is_consistent() {
            warn!("Inconsistent {kind} stats observed: {stats:?}");
        }

        let channel = Channel::for_kind(kind);
        let report = self.broadcaster.publish(channel, &Message::stats(kind, stats));
        debug!(
            "Broadcast {kind} stats to {} subscriber(s), {} failed",
            report.delivered, report.failed
        );

        Ok(())
    }
}
