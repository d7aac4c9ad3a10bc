//! SeaORM Entity for the cats table.

use crate::animal_size::AnimalSize;
use crate::animal_status::AnimalStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::cats::Model)]
#[sea_orm(schema_name = "shelter", table_name = "cats")]
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

    #[schema(value_type = String, format = Date)]
    pub admitted_date: Date,

    #[schema(value_type = Option<String>, format = Date)]
    pub released_date: Option<Date>,

    #[serde(default)]
    pub status: AnimalStatus,

    /// Whether the cat must live indoors only
    #[serde(default)]
    pub indoor_only: bool,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
