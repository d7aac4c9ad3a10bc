//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters and partial updates within the domain
//! layer, while the underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    query::{IntoQueryFilterMap, QueryFilterMap, QuerySort},
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{animal_size, animal_status, cats, dog_history, dogs, Id};

pub mod cat;
pub mod change_detector;
pub mod dog;
pub mod error;
pub mod validation;
