//! Field-level diffing between a stored record and a partial update.
use crate::UpdateMap;
use entity_api::dog::FieldChange;
use sea_orm::sea_query::Value;
use sea_orm::{EntityTrait, IdenStatic, Iterable, ModelTrait};

/// Lists the columns of `model` whose value `update_map` would change, in column-name
/// order.
///
/// Both sides go through [`stringify`] before comparison, so a date sent by the client
/// and the same date read back from the database compare equal. Keys that do not name
/// a column are ignored.
pub fn detect_changes<M>(model: &M, update_map: &UpdateMap) -> Vec<FieldChange>
where
    M: ModelTrait,
{
    update_map
        .iter()
        .filter_map(|(field_name, new_value)| {
            let column = <M::Entity as EntityTrait>::Column::iter()
                .find(|column| column.as_str() == field_name)?;

            let old_value = stringify(&model.get(column));
            let new_value = new_value.and_then(stringify);

            (old_value != new_value).then(|| FieldChange {
                field_name: field_name.to_string(),
                old_value,
                new_value,
            })
        })
        .collect()
}

/// The text form stored in the change history. SQL NULL of any type becomes `None`.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Bool(v) => v.map(|v| v.to_string()),
        Value::TinyInt(v) => v.map(|v| v.to_string()),
        Value::SmallInt(v) => v.map(|v| v.to_string()),
        Value::Int(v) => v.map(|v| v.to_string()),
        Value::BigInt(v) => v.map(|v| v.to_string()),
        Value::TinyUnsigned(v) => v.map(|v| v.to_string()),
        Value::SmallUnsigned(v) => v.map(|v| v.to_string()),
        Value::Unsigned(v) => v.map(|v| v.to_string()),
        Value::BigUnsigned(v) => v.map(|v| v.to_string()),
        Value::String(v) => v.as_deref().cloned(),
        Value::ChronoDate(v) => v.as_deref().map(|d| d.format("%Y-%m-%d").to_string()),
        Value::ChronoDateTimeWithTimeZone(v) => v.as_deref().map(|dt| dt.to_rfc3339()),
        Value::Uuid(v) => v.as_deref().map(|u| u.to_string()),
        other => Some(format!("{other:?}")),
    }
}
