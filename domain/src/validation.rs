//! Business rules checked before anything is written.
use crate::error::Error;
use crate::UpdateMap;
use chrono::{NaiveDate, Utc};
use sea_orm::Value;

/// Columns holding calendar dates that may not lie in the future.
pub(crate) const DATE_COLUMNS: [&str; 3] = ["birth_date", "admitted_date", "released_date"];

/// Rejects a date later than `today`. Absent dates are fine.
pub fn ensure_not_in_future(
    field_name: &str,
    date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), Error> {
    match date {
        Some(date) if date > today => Err(Error::validation(format!(
            "{} cannot be in the future",
            humanize(field_name)
        ))),
        _ => Ok(()),
    }
}

/// Checks the date fields of a record about to be created.
pub(crate) fn validate_dates(
    birth_date: Option<NaiveDate>,
    admitted_date: NaiveDate,
    released_date: Option<NaiveDate>,
) -> Result<(), Error> {
    let today = Utc::now().date_naive();
    ensure_not_in_future("birth_date", birth_date, today)?;
    ensure_not_in_future("admitted_date", Some(admitted_date), today)?;
    ensure_not_in_future("released_date", released_date, today)
}

/// Checks the date fields present in a partial update.
pub(crate) fn validate_update_dates(update_map: &UpdateMap) -> Result<(), Error> {
    let today = Utc::now().date_naive();
    for column in DATE_COLUMNS {
        if let Some(Value::ChronoDate(Some(date))) = update_map.get(column) {
            ensure_not_in_future(column, Some(**date), today)?;
        }
    }
    Ok(())
}

/// Column names are sent back to API clients, so `birth_date` reads "Birth date".
fn humanize(field_name: &str) -> String {
    let spaced = field_name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use chrono::Days;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[test]
    fn today_and_past_dates_are_accepted() {
        assert!(ensure_not_in_future("admitted_date", Some(today()), today()).is_ok());
        assert!(ensure_not_in_future("birth_date", None, today()).is_ok());
    }

    #[test]
    fn future_dates_are_rejected_with_a_readable_message() {
        let tomorrow = today().checked_add_days(Days::new(1)).unwrap();

        let err = ensure_not_in_future("released_date", Some(tomorrow), today()).unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation("Released date cannot be in the future".to_string())
        );
    }

    #[test]
    fn update_with_future_birth_date_is_rejected() {
        let next_year = today().checked_add_days(Days::new(365)).unwrap();
        let mut update_map = UpdateMap::new();
        update_map.insert("birth_date".to_string(), Some(Value::from(next_year)));
        update_map.insert("name".to_string(), Some(Value::from("Rex")));

        assert!(validate_update_dates(&update_map).is_err());
    }

    #[test]
    fn update_clearing_a_date_is_accepted() {
        let mut update_map = UpdateMap::new();
        update_map.insert(
            "released_date".to_string(),
            Some(Value::ChronoDate(None)),
        );

        assert!(validate_update_dates(&update_map).is_ok());
    }
}
