use crate::error::Error;
use crate::validation::{validate_dates, validate_update_dates};
use crate::{cats, Id, UpdateMap};
use entity_api::cat as CatApi;
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use events::{AnimalKind, DomainEvent, EventSender};
use sea_orm::DatabaseConnection;

pub use entity_api::cat::find_by_id;

pub async fn create(
    db: &DatabaseConnection,
    events: &EventSender,
    cat_model: cats::Model,
) -> Result<cats::Model, Error> {
    validate_dates(
        cat_model.birth_date,
        cat_model.admitted_date,
        cat_model.released_date,
    )?;

    let cat = CatApi::create(db, cat_model).await?;

    events.send(DomainEvent::AnimalCreated {
        kind: AnimalKind::Cat,
        id: cat.id,
    });

    Ok(cat)
}

pub async fn update(
    db: &DatabaseConnection,
    events: &EventSender,
    id: Id,
    update_map: UpdateMap,
) -> Result<cats::Model, Error> {
    validate_update_dates(&update_map)?;

    let cat = CatApi::update(db, id, update_map).await?;

    events.send(DomainEvent::AnimalUpdated {
        kind: AnimalKind::Cat,
        id: cat.id,
    });

    Ok(cat)
}

pub async fn delete_by_id(
    db: &DatabaseConnection,
    events: &EventSender,
    id: Id,
) -> Result<(), Error> {
    CatApi::delete_by_id(db, id).await?;

    events.send(DomainEvent::AnimalDeleted {
        kind: AnimalKind::Cat,
        id,
    });

    Ok(())
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<cats::Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<cats::Column>,
{
    Ok(CatApi::find_by(db, params).await?)
}
