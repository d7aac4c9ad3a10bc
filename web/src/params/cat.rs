use chrono::NaiveDate;
use sea_orm::{Order, Value};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::deserialize_some;
use super::sort::{SortField, SortOrder};
use domain::animal_size::AnimalSize;
use domain::animal_status::AnimalStatus;
use domain::{cats, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    pub(crate) size: Option<AnimalSize>,
    pub(crate) status: Option<AnimalStatus>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("size".to_string(), self.size.map(Into::into));
        query_filter_map.insert("status".to_string(), self.status.map(Into::into));
        query_filter_map
    }
}

impl QuerySort<cats::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<cats::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::Name => cats::Column::Name,
            SortField::AdmittedDate => cats::Column::AdmittedDate,
            SortField::BirthDate => cats::Column::BirthDate,
            SortField::Status => cats::Column::Status,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

/// Partial update of a cat. Omitted fields keep their value; `null` clears an
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
    pub(crate) indoor_only: Option<bool>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();

        let fields: [(&str, Option<Value>); 9] = [
            ("name", self.name.map(Value::from)),
            ("size", self.size.map(Into::into)),
            ("birth_date", self.birth_date.map(Value::from)),
            ("sex", self.sex.map(Value::from)),
            ("neutered", self.neutered.map(Value::from)),
            ("admitted_date", self.admitted_date.map(Value::from)),
            ("released_date", self.released_date.map(Value::from)),
            ("status", self.status.map(Into::into)),
            ("indoor_only", self.indoor_only.map(Value::from)),
        ];
        for (column, value) in fields {
            if value.is_some() {
                update_map.insert(column.to_string(), value);
            }
        }

        update_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sent_fields_reach_the_update_map() {
        let params: UpdateParams =
            serde_json::from_str(r#"{"indoor_only": true, "sex": null}"#).unwrap();

        let update_map = params.into_update_map();

        let keys: Vec<&str> = update_map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["indoor_only", "sex"]);
        assert_eq!(update_map.get("sex"), Some(&Value::String(None)));
    }

    #[test]
    fn size_and_status_filters_are_equality_filters() {
        let params = IndexParams {
            size: Some(AnimalSize::Small),
            status: Some(AnimalStatus::Returned),
            ..Default::default()
        };

        let query_filter_map = params.into_query_filter_map();

        assert_eq!(
            query_filter_map.get("size"),
            Some(Into::<Value>::into(AnimalSize::Small))
        );
        assert!(query_filter_map.conditions().is_empty());
    }
}
