//! SeaORM Entity for the dogs table.

use crate::animal_size::AnimalSize;
use crate::animal_status::AnimalStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::dogs::Model)]
#[sea_orm(schema_name = "shelter", table_name = "dogs")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    pub name: String,

    pub size: AnimalSize,

    #[schema(value_type = Option<String>, format = Date)]
    pub birth_date: Option<Date>,

    pub sex: Option<String>,

    #[serde(default)]
    pub neutered: bool,

    /// Day the dog was taken in by the shelter
    #[schema(value_type = String, format = Date)]
    pub admitted_date: Date,

    /// Day the dog left the shelter, if it has
    #[schema(value_type = Option<String>, format = Date)]
    pub released_date: Option<Date>,

    #[serde(default)]
    pub status: AnimalStatus,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dog_history::Entity")]
    DogHistory,
}

impl Related<super::dog_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DogHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
