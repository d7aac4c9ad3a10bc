use crate::error::Error;
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoSimpleExpr, Order, QueryFilter,
    QueryOrder, Select, Value,
};
use std::collections::HashMap;

/// `QueryFilterMap` carries filter parameters from a web request down to the database
/// query layer.
///
/// Equality filters are keyed by column name, so only keys that match one of the entity's
/// columns are ever applied. Filters that are not a plain equality (date ranges, derived
/// age bounds) are carried as ready-made `Condition`s.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::query::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("status".to_string(), Some(Value::String(Some(Box::new("arrived".to_string())))));
/// let filter_value = query_filter_map.get("status");
/// assert!(filter_value.is_some());
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
    conditions: Vec<Condition>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            conditions: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    /// Adds a non-equality filter that is ANDed with every other filter.
    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts typed request parameters into a `QueryFilterMap`.
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Optional ordering requested alongside a filter.
pub trait QuerySort<C: ColumnTrait> {
    fn get_sort_column(&self) -> Option<C>;
    fn get_sort_order(&self) -> Option<Order>;
}

/// Builds the `SELECT` for `params` without executing it.
pub fn filtered_select<E, C, P>(params: P) -> Select<E>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator + IntoSimpleExpr,
    P: IntoQueryFilterMap + QuerySort<C>,
{
    let sort_column = params.get_sort_column();
    let sort_order = params.get_sort_order().unwrap_or(Order::Asc);
    let query_filter_map = params.into_query_filter_map();

    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    for condition in query_filter_map.conditions() {
        query = query.filter(condition.clone());
    }

    if let Some(column) = sort_column {
        query = query.order_by(column, sort_order);
    }

    query
}

/// Find all records of an entity matching the given filter and sort parameters.
pub async fn find_by<E, C, P>(db: &impl ConnectionTrait, params: P) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator + IntoSimpleExpr,
    P: IntoQueryFilterMap + QuerySort<C>,
{
    Ok(filtered_select::<E, C, P>(params).all(db).await?)
}
