use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::query::{self, IntoQueryFilterMap, QuerySort};
use entity::animal_status::AnimalStatus;
use entity::cats::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, IntoActiveModel};

use log::*;

pub async fn create(db: &DatabaseConnection, cat_model: Model) -> Result<Model, Error> {
    debug!("New Cat Model to be inserted: {cat_model:?}");

    let now = chrono::Utc::now();

    let cat_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        name: Set(cat_model.name),
        size: Set(cat_model.size),
        birth_date: Set(cat_model.birth_date),
        sex: Set(cat_model.sex),
        neutered: Set(cat_model.neutered),
        admitted_date: Set(cat_model.admitted_date),
        released_date: Set(cat_model.released_date),
        status: Set(cat_model.status),
        indoor_only: Set(cat_model.indoor_only),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(cat_active_model.insert(db).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let cat = find_by_id(db, id).await?;
    debug!("Existing Cat model to be Updated: {cat:?}");

    update_map.insert(
        Column::UpdatedAt.to_string(),
        Some(DateTimeWithTimeZone::from(chrono::Utc::now()).into()),
    );

    mutate::update::<ActiveModel, Column>(db, cat.into_active_model(), &update_map).await
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let cat = find_by_id(db, id).await?;
    cat.delete(db).await?;
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

/// Number of cats, optionally restricted to one status.
pub async fn count(db: &DatabaseConnection, status: Option<AnimalStatus>) -> Result<u64, Error> {
    let mut query = Entity::find();
    if let Some(status) = status {
        query = query.filter(Column::Status.eq(status));
    }
    Ok(query.count(db).await?)
}
