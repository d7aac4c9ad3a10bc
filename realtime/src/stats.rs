use crate::message::{AggregateStats, Channel, Message};
use crate::status::StatusState;
use async_trait::async_trait;
use entity_api::animal_status::AnimalStatus;
use entity_api::error::Error;
use entity_api::{cat, dog};
use events::AnimalKind;
use sea_orm::DatabaseConnection;

/// The counting queries statistics are built from.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Number of animals of `kind`, restricted to `status` when given.
    async fn count(&self, kind: AnimalKind, status: Option<AnimalStatus>) -> Result<u64, Error>;
}

#[async_trait]
impl StatsRepository for DatabaseConnection {
    async fn count(&self, kind: AnimalKind, status: Option<AnimalStatus>) -> Result<u64, Error> {
        match kind {
            AnimalKind::Dog => dog::count(self, status).await,
            AnimalKind::Cat => cat::count(self, status).await,
        }
    }
}

/// Recomputes the statistics of `kind` from scratch.
pub async fn compute_stats(
    repository: &dyn StatsRepository,
    kind: AnimalKind,
) -> Result<AggregateStats, Error> {
    let (total, current_in_shelter, adopted_total, returned_total) = tokio::try_join!(
        repository.count(kind, None),
        repository.count(kind, Some(AnimalStatus::Arrived)),
        repository.count(kind, Some(AnimalStatus::Adopted)),
        repository.count(kind, Some(AnimalStatus::Returned)),
    )?;

    Ok(AggregateStats {
        current_in_shelter,
        adopted_total,
        returned_total,
        total,
    })
}

/// The message a new subscriber of `channel` receives before any broadcast.
pub async fn snapshot(
    repository: &dyn StatsRepository,
    status: &StatusState,
    channel: Channel,
) -> Result<Message, Error> {
    match channel.kind() {
        Some(kind) => Ok(Message::stats(kind, compute_stats(repository, kind).await?)),
        None => Ok(Message::ServerStatus(status.read())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_api::error::EntityApiErrorKind;

    struct FixedCounts;

    #[async_trait]
    impl StatsRepository for FixedCounts {
        async fn count(
            &self,
            kind: AnimalKind,
            status: Option<AnimalStatus>,
        ) -> Result<u64, Error> {
            let per_status = match kind {
                AnimalKind::Dog => [4, 2, 1],
                AnimalKind::Cat => [1, 0, 0],
            };
            Ok(match status {
                None => per_status.iter().sum(),
                Some(AnimalStatus::Arrived) => per_status[0],
                Some(AnimalStatus::Adopted) => per_status[1],
                Some(AnimalStatus::Returned) => per_status[2],
            })
        }
    }

    struct Unavailable;

    #[async_trait]
    impl StatsRepository for Unavailable {
        async fn count(&self, _: AnimalKind, _: Option<AnimalStatus>) -> Result<u64, Error> {
            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::SystemError,
            })
        }
    }

    #[tokio::test]
    async fn compute_stats_shapes_the_four_counts() {
        let stats = compute_stats(&FixedCounts, AnimalKind::Dog).await.unwrap();

        assert_eq!(
            stats,
            AggregateStats {
                current_in_shelter: 4,
                adopted_total: 2,
                returned_total: 1,
                total: 7
            }
        );
        assert!(stats.is_consistent());
    }

    #[tokio::test]
    async fn compute_stats_propagates_repository_errors() {
        let result = compute_stats(&Unavailable, AnimalKind::Cat).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::SystemError
        );
    }

    #[tokio::test]
    async fn snapshot_of_status_channel_does_not_query_the_repository() {
        let status = StatusState::new();

        let message = snapshot(&Unavailable, &status, Channel::Status)
            .await
            .unwrap();

        assert_eq!(message, Message::ServerStatus(status.read()));
    }

    #[tokio::test]
    async fn snapshot_of_cats_channel_carries_cat_stats() {
        let message = snapshot(&FixedCounts, &StatusState::new(), Channel::Cats)
            .await
            .unwrap();

        assert_eq!(message.message_type(), "cat_stats");
    }
}
