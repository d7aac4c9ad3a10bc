use super::error::Error;
use entity::dog_history::{Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder};

/// Every recorded change for a dog, oldest first.
pub async fn find_by_dog_id(db: &DatabaseConnection, dog_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::DogId.eq(dog_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::FieldName)
        .all(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    #[tokio::test]
    async fn find_by_dog_id_filters_and_orders_by_creation_time() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let dog_id = Id::new_v4();
        let _ = find_by_dog_id(&db, dog_id).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "dog_history"."id", "dog_history"."dog_id", "dog_history"."field_name", "dog_history"."old_value", "dog_history"."new_value", "dog_history"."created_at" FROM "shelter"."dog_history" WHERE "dog_history"."dog_id" = $1 ORDER BY "dog_history"."created_at" ASC, "dog_history"."field_name" ASC"#,
                [dog_id.into()]
            )]
        );

        Ok(())
    }
}
