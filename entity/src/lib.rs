use uuid::Uuid;

pub mod animal_size;
pub mod animal_status;
pub mod cats;
pub mod dog_history;
pub mod dogs;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
