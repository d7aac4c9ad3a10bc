use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where an animal currently stands with the shelter. Every dog and cat has
/// exactly one of these at any time, which is what keeps the aggregate
/// counters summing to the total.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    Deserialize,
    Serialize,
    Default,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "animal_status")]
pub enum AnimalStatus {
    /// Currently housed by the shelter
    #[sea_orm(string_value = "arrived")]
    #[default]
    Arrived,
    /// Left the shelter with a new owner
    #[sea_orm(string_value = "adopted")]
    Adopted,
    /// Brought back after an adoption
    #[sea_orm(string_value = "returned")]
    Returned,
}

impl std::fmt::Display for AnimalStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimalStatus::Arrived => write!(fmt, "arrived"),
            AnimalStatus::Adopted => write!(fmt, "adopted"),
            AnimalStatus::Returned => write!(fmt, "returned"),
        }
    }
}
