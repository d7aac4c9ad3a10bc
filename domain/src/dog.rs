use crate::change_detector::detect_changes;
use crate::error::Error;
use crate::validation::{validate_dates, validate_update_dates};
use crate::{dog_history, dogs, Id, UpdateMap};
use entity_api::dog as DogApi;
use entity_api::history as HistoryApi;
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use events::{AnimalKind, DomainEvent, EventSender};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;

pub use entity_api::dog::find_by_id;

/// A dog together with every recorded change to it, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DogWithHistory {
    #[serde(flatten)]
    pub dog: dogs::Model,
    pub history: Vec<dog_history::Model>,
}

pub async fn create(
    db: &DatabaseConnection,
    events: &EventSender,
    dog_model: dogs::Model,
) -> Result<dogs::Model, Error> {
    validate_dates(
        dog_model.birth_date,
        dog_model.admitted_date,
        dog_model.released_date,
    )?;

    let dog = DogApi::create(db, dog_model).await?;

    events.send(DomainEvent::AnimalCreated {
        kind: AnimalKind::Dog,
        id: dog.id,
    });

    Ok(dog)
}

/// Applies a partial update and records one history row per field it changes.
pub async fn update(
    db: &DatabaseConnection,
    events: &EventSender,
    id: Id,
    update_map: UpdateMap,
) -> Result<dogs::Model, Error> {
    validate_update_dates(&update_map)?;

    let dog = DogApi::find_by_id(db, id).await?;
    let changes = detect_changes(&dog, &update_map);
    debug!("Dog {id} update changes {} field(s)", changes.len());

    let dog = DogApi::update_with_history(db, dog, update_map, changes).await?;

    events.send(DomainEvent::AnimalUpdated {
        kind: AnimalKind::Dog,
        id: dog.id,
    });

    Ok(dog)
}

pub async fn delete_by_id(
    db: &DatabaseConnection,
    events: &EventSender,
    id: Id,
) -> Result<(), Error> {
    DogApi::delete_by_id(db, id).await?;

    events.send(DomainEvent::AnimalDeleted {
        kind: AnimalKind::Dog,
        id,
    });

    Ok(())
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<dogs::Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<dogs::Column>,
{
    Ok(DogApi::find_by(db, params).await?)
}

pub async fn find_with_history(db: &DatabaseConnection, id: Id) -> Result<DogWithHistory, Error> {
    let dog = DogApi::find_by_id(db, id).await?;
    let history = HistoryApi::find_by_dog_id(db, id).await?;
    Ok(DogWithHistory { dog, history })
}

/// Change history of a dog, oldest first. Empty when the dog has none or does not exist.
pub async fn history(db: &DatabaseConnection, id: Id) -> Result<Vec<dog_history::Model>, Error> {
    Ok(HistoryApi::find_by_dog_id(db, id).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind};
    use chrono::{Days, NaiveDate, Utc};
    use entity::animal_size::AnimalSize;
    use entity::animal_status::AnimalStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn dog(status: AnimalStatus) -> dogs::Model {
        let now = Utc::now();
        dogs::Model {
            id: Id::new_v4(),
            name: "Reksio".to_owned(),
            size: AnimalSize::Medium,
            birth_date: None,
            sex: None,
            neutered: true,
            admitted_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            released_date: None,
            status,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_emits_a_created_event() -> Result<(), Error> {
        let model = dog(AnimalStatus::Arrived);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();
        let (events, mut rx) = EventSender::channel();

        let created = create(&db, &events, model.clone()).await?;

        assert_eq!(
            rx.try_recv().unwrap(),
            DomainEvent::AnimalCreated {
                kind: AnimalKind::Dog,
                id: created.id
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_future_admission_without_touching_the_database() {
        let mut model = dog(AnimalStatus::Arrived);
        model.admitted_date = Utc::now()
            .date_naive()
            .checked_add_days(Days::new(3))
            .unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let (events, mut rx) = EventSender::channel();

        let err = create(&db, &events, model).await.unwrap_err();

        assert!(matches!(err.error_kind, DomainErrorKind::Validation(_)));
        assert!(rx.try_recv().is_err());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn update_of_a_missing_dog_is_not_found_and_emits_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<dogs::Model>::new()])
            .into_connection();
        let (events, mut rx) = EventSender::channel();

        let err = update(&db, &events, Id::new_v4(), UpdateMap::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn update_to_adopted_emits_an_updated_event() -> Result<(), Error> {
        let stored = dog(AnimalStatus::Arrived);
        let mut adopted = stored.clone();
        adopted.status = AnimalStatus::Adopted;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored.clone()], vec![adopted.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let (events, mut rx) = EventSender::channel();

        let mut update_map = UpdateMap::new();
        update_map.insert(
            "status".to_string(),
            Some(Into::<Value>::into(AnimalStatus::Adopted)),
        );

        let updated = update(&db, &events, stored.id, update_map).await?;

        assert_eq!(updated.status, AnimalStatus::Adopted);
        assert_eq!(
            rx.try_recv().unwrap(),
            DomainEvent::AnimalUpdated {
                kind: AnimalKind::Dog,
                id: stored.id
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_emits_a_deleted_event() -> Result<(), Error> {
        let stored = dog(AnimalStatus::Returned);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored.clone()]])
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let (events, mut rx) = EventSender::channel();

        delete_by_id(&db, &events, stored.id).await?;

        assert_eq!(
            rx.try_recv().unwrap(),
            DomainEvent::AnimalDeleted {
                kind: AnimalKind::Dog,
                id: stored.id
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn details_serialize_dog_fields_next_to_history() -> Result<(), Error> {
        let stored = dog(AnimalStatus::Adopted);
        let entry = dog_history::Model {
            id: Id::new_v4(),
            dog_id: stored.id,
            field_name: "status".to_owned(),
            old_value: Some("arrived".to_owned()),
            new_value: Some("adopted".to_owned()),
            created_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored.clone()]])
            .append_query_results(vec![vec![entry.clone()]])
            .into_connection();

        let details = find_with_history(&db, stored.id).await?;
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(json["name"], "Reksio");
        assert_eq!(json["history"][0]["new_value"], "adopted");
        Ok(())
    }
}
