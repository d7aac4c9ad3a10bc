use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::query::{self, IntoQueryFilterMap, QuerySort};
use entity::animal_status::AnimalStatus;
use entity::dogs::{ActiveModel, Column, Entity, Model};
use entity::{dog_history, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, IntoActiveModel, TransactionTrait,
};

use log::*;

pub async fn create(db: &DatabaseConnection, dog_model: Model) -> Result<Model, Error> {
    debug!("New Dog Model to be inserted: {dog_model:?}");

    let now = chrono::Utc::now();

    let dog_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        name: Set(dog_model.name),
        size: Set(dog_model.size),
        birth_date: Set(dog_model.birth_date),
        sex: Set(dog_model.sex),
        neutered: Set(dog_model.neutered),
        admitted_date: Set(dog_model.admitted_date),
        released_date: Set(dog_model.released_date),
        status: Set(dog_model.status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(dog_active_model.insert(db).await?)
}

/// Applies `update_map` to the dog and appends `changes` to its history, atomically.
///
/// `changes` are the field deltas computed by the caller against `dog`, the stored
/// record the update is based on.
pub async fn update_with_history(
    db: &DatabaseConnection,
    dog: Model,
    mut update_map: UpdateMap,
    changes: Vec<FieldChange>,
) -> Result<Model, Error> {
    debug!("Existing Dog model to be Updated: {dog:?}");

    let dog_id = dog.id;
    update_map.insert(
        Column::UpdatedAt.to_string(),
        Some(DateTimeWithTimeZone::from(chrono::Utc::now()).into()),
    );

    let txn = db.begin().await?;

    let updated =
        mutate::update::<ActiveModel, Column>(&txn, dog.into_active_model(), &update_map).await?;

    if !changes.is_empty() {
        let now = chrono::Utc::now();
        let records = changes.into_iter().map(|change| dog_history::ActiveModel {
            id: Set(Id::new_v4()),
            dog_id: Set(dog_id),
            field_name: Set(change.field_name),
            old_value: Set(change.old_value),
            new_value: Set(change.new_value),
            created_at: Set(now.into()),
        });
        dog_history::Entity::insert_many(records)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    Ok(updated)
}

/// Deletes the dog along with its change history.
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let dog = find_by_id(db, id).await?;

    let txn = db.begin().await?;
    dog_history::Entity::delete_many()
        .filter(dog_history::Column::DogId.eq(id))
        .exec(&txn)
        .await?;
    dog.delete(&txn).await?;
    txn.commit().await?;

    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<Column>,
{
    query::find_by::<Entity, Column, P>(db, params).await
}

/// Number of dogs, optionally restricted to one status.
pub async fn count(db: &DatabaseConnection, status: Option<AnimalStatus>) -> Result<u64, Error> {
    let mut query = Entity::find();
    if let Some(status) = status {
        query = query.filter(Column::Status.eq(status));
    }
    Ok(query.count(db).await?)
}

/// One changed column of a dog update, with both sides already stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::animal_size::AnimalSize;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn dog_model(status: AnimalStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            name: "Reksio".to_owned(),
            size: AnimalSize::Medium,
            birth_date: chrono::NaiveDate::from_ymd_opt(2020, 5, 10),
            sex: Some("male".to_owned()),
            neutered: true,
            admitted_date: chrono::NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            released_date: None,
            status,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_dog_model() -> Result<(), Error> {
        let dog = dog_model(AnimalStatus::Arrived);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![dog.clone()]])
            .into_connection();

        let created = create(&db, dog.clone()).await?;

        assert_eq!(created.id, dog.id);
        assert_eq!(created.name, "Reksio");

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_error_when_dog_not_found() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;

        assert_eq!(result, Err(Error::not_found()));

        Ok(())
    }

    #[tokio::test]
    async fn update_with_history_writes_the_update_and_history_rows() -> Result<(), Error> {
        let dog = dog_model(AnimalStatus::Arrived);
        let mut adopted = dog.clone();
        adopted.status = AnimalStatus::Adopted;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![adopted.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let mut update_map = UpdateMap::new();
        update_map.insert(
            "status".to_string(),
            Some(Into::<Value>::into(AnimalStatus::Adopted)),
        );
        let changes = vec![FieldChange {
            field_name: "status".to_string(),
            old_value: Some("arrived".to_string()),
            new_value: Some("adopted".to_string()),
        }];

        let updated = update_with_history(&db, dog, update_map, changes).await?;

        assert_eq!(updated.status, AnimalStatus::Adopted);

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_returns_error_when_dog_not_found() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = delete_by_id(&db, Id::new_v4()).await;

        assert!(result.is_err());

        Ok(())
    }
}
