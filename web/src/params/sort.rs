use sea_orm::Order;
use serde::Deserialize;
use utoipa::ToSchema;

/// Common sort order values used across all entities
#[derive(Debug, Deserialize, ToSchema, Clone, Default)]
#[schema(example = "desc")]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl From<&SortOrder> for Order {
    fn from(order: &SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Fields both dogs and cats can be listed by.
#[derive(Debug, Deserialize, ToSchema, Clone)]
#[schema(example = "admitted_date")]
pub(crate) enum SortField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "admitted_date")]
    AdmittedDate,
    #[serde(rename = "birth_date")]
    BirthDate,
    #[serde(rename = "status")]
    Status,
}
