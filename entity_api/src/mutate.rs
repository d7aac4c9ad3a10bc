use crate::error::Error;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, Iterable, Value,
};
use std::collections::BTreeMap;

/// Applies a partial update to an existing record.
///
/// Only the columns present in `update_map` are written; every other column keeps its
/// stored value. Keys that do not name a column of the entity are ignored.
pub async fn update<A, C>(
    db: &impl ConnectionTrait,
    mut active_model: A,
    update_map: &UpdateMap,
) -> Result<<A::Entity as EntityTrait>::Model, Error>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ColumnTrait,
    A::Entity: EntityTrait<Column = C>,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    for column in C::iter() {
        if let Some(value) = update_map.get(&column.to_string()) {
            active_model.set(column, value.clone());
        }
    }
    Ok(active_model.update(db).await?)
}

/// Column name to new value pairs for a partial update.
///
/// Keys are kept sorted so that anything derived from the map (change records, logs)
/// comes out in a stable order.
#[derive(Debug, Default, Clone)]
pub struct UpdateMap {
    map: BTreeMap<String, Option<Value>>,
}

impl UpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, or None if the key is absent or holds no value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).and_then(|opt| opt.as_ref())
    }

    /// Inserts a key-value pair, overwriting any previous value for the key.
    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates `(column_name, value)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

/// Converts a partial-update payload into an `UpdateMap`.
pub trait IntoUpdateMap {
    fn into_update_map(self) -> UpdateMap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_yields_keys_in_sorted_order() {
        let mut map = UpdateMap::new();
        map.insert("status".to_string(), Some(Value::from("adopted")));
        map.insert("name".to_string(), Some(Value::from("Rex")));
        map.insert("released_date".to_string(), None);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "released_date", "status"]);
    }

    #[test]
    fn get_flattens_missing_values() {
        let mut map = UpdateMap::new();
        map.insert("sex".to_string(), None);

        assert!(map.contains_key("sex"));
        assert!(map.get("sex").is_none());
        assert!(map.get("name").is_none());
    }
}
