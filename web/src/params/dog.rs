use chrono::{Days, NaiveDate, Utc};
use sea_orm::{ColumnTrait, Condition, Order, Value};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::deserialize_some;
use super::sort::{SortField, SortOrder};
use domain::animal_size::AnimalSize;
use domain::animal_status::AnimalStatus;
use domain::{dogs, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap};

/// Ages are whole years of 365 days, counted back from today.
fn years_ago(years: u32) -> NaiveDate {
    let today = Utc::now().date_naive();
    today
        .checked_sub_days(Days::new(u64::from(years) * 365))
        .unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    pub(crate) size: Option<AnimalSize>,
    pub(crate) sex: Option<String>,
    pub(crate) status: Option<AnimalStatus>,
    /// Only dogs at least this many years old
    pub(crate) min_age: Option<u32>,
    /// Only dogs at most this many years old
    pub(crate) max_age: Option<u32>,
    /// Admitted on or after this date
    pub(crate) admitted_from: Option<NaiveDate>,
    /// Admitted on or before this date
    pub(crate) admitted_to: Option<NaiveDate>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();

        query_filter_map.insert("size".to_string(), self.size.map(Into::into));
        query_filter_map.insert("sex".to_string(), self.sex.map(Value::from));
        query_filter_map.insert("status".to_string(), self.status.map(Into::into));

        if let Some(min_age) = self.min_age {
            query_filter_map.add_condition(
                Condition::all().add(dogs::Column::BirthDate.lte(years_ago(min_age))),
            );
        }
        if let Some(max_age) = self.max_age {
            query_filter_map.add_condition(
                Condition::all().add(dogs::Column::BirthDate.gte(years_ago(max_age))),
            );
        }
        if let Some(admitted_from) = self.admitted_from {
            query_filter_map
                .add_condition(Condition::all().add(dogs::Column::AdmittedDate.gte(admitted_from)));
        }
        if let Some(admitted_to) = self.admitted_to {
            query_filter_map
                .add_condition(Condition::all().add(dogs::Column::AdmittedDate.lte(admitted_to)));
        }

        query_filter_map
    }
}

impl QuerySort<dogs::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<dogs::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::Name => dogs::Column::Name,
            SortField::AdmittedDate => dogs::Column::AdmittedDate,
            SortField::BirthDate => dogs::Column::BirthDate,
            SortField::Status => dogs::Column::Status,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

/// Partial update of a dog. Omitted fields keep their value; `null` clears an
/// optional field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) name: Option<String>,
    pub(crate) size: Option<AnimalSize>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = Date)]
    pub(crate) birth_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub(crate) sex: Option<Option<String>>,
    pub(crate) neutered: Option<bool>,
    #[schema(value_type = Option<String>, format = Date)]
    pub(crate) admitted_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = Date)]
    pub(crate) released_date: Option<Option<NaiveDate>>,
    pub(crate) status: Option<AnimalStatus>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();

        if let Some(name) = self.name {
            update_map.insert("name".to_string(), Some(Value::from(name)));
        }
        if let Some(size) = self.size {
            update_map.insert("size".to_string(), Some(size.into()));
        }
        if let Some(birth_date) = self.birth_date {
            update_map.insert("birth_date".to_string(), Some(Value::from(birth_date)));
        }
        if let Some(sex) = self.sex {
            update_map.insert("sex".to_string(), Some(Value::from(sex)));
        }
        if let Some(neutered) = self.neutered {
            update_map.insert("neutered".to_string(), Some(Value::from(neutered)));
        }
        if let Some(admitted_date) = self.admitted_date {
            update_map.insert("admitted_date".to_string(), Some(Value::from(admitted_date)));
        }
        if let Some(released_date) = self.released_date {
            update_map.insert("released_date".to_string(), Some(Value::from(released_date)));
        }
        if let Some(status) = self.status {
            update_map.insert("status".to_string(), Some(status.into()));
        }

        update_map
    }
}
