use chrono::{Days, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub use entity::{animal_size, animal_status, cats, dog_history, dogs, Id};

pub mod cat;
pub mod dog;
pub mod error;
pub mod history;
pub mod mutate;
pub mod query;

use animal_size::AnimalSize;
use animal_status::AnimalStatus;

struct SeedAnimal {
    name: &'static str,
    size: AnimalSize,
    age_days: Option<u64>,
    sex: Option<&'static str>,
    neutered: bool,
    admitted_days_ago: u64,
    released_days_ago: Option<u64>,
    status: AnimalStatus,
}

const SEED_DOGS: &[SeedAnimal] = &[
    SeedAnimal {
        name: "Burek",
        size: AnimalSize::Large,
        age_days: Some(6 * 365),
        sex: Some("male"),
        neutered: true,
        admitted_days_ago: 120,
        released_days_ago: None,
        status: AnimalStatus::Arrived,
    },
    SeedAnimal {
        name: "Luna",
        size: AnimalSize::Medium,
        age_days: Some(2 * 365),
        sex: Some("female"),
        neutered: true,
        admitted_days_ago: 90,
        released_days_ago: Some(30),
        status: AnimalStatus::Adopted,
    },
    SeedAnimal {
        name: "Fafik",
        size: AnimalSize::Small,
        age_days: None,
        sex: None,
        neutered: false,
        admitted_days_ago: 60,
        released_days_ago: Some(20),
        status: AnimalStatus::Returned,
    },
    SeedAnimal {
        name: "Saba",
        size: AnimalSize::Large,
        age_days: Some(9 * 365),
        sex: Some("female"),
        neutered: true,
        admitted_days_ago: 10,
        released_days_ago: None,
        status: AnimalStatus::Arrived,
    },
];

const SEED_CATS: &[SeedAnimal] = &[
    SeedAnimal {
        name: "Mruczek",
        size: AnimalSize::Small,
        age_days: Some(3 * 365),
        sex: Some("male"),
        neutered: true,
        admitted_days_ago: 45,
        released_days_ago: None,
        status: AnimalStatus::Arrived,
    },
    SeedAnimal {
        name: "Kicia",
        size: AnimalSize::Small,
        age_days: Some(365),
        sex: Some("female"),
        neutered: false,
        admitted_days_ago: 80,
        released_days_ago: Some(15),
        status: AnimalStatus::Adopted,
    },
];

fn days_ago(days: u64) -> NaiveDate {
    let today = Utc::now().date_naive();
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

/// Inserts a small, fixed set of dogs and cats for local development.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let now = Utc::now();

    for seed in SEED_DOGS {
        dogs::ActiveModel {
            id: Set(Id::new_v4()),
            name: Set(seed.name.to_owned()),
            size: Set(seed.size),
            birth_date: Set(seed.age_days.map(days_ago)),
            sex: Set(seed.sex.map(str::to_owned)),
            neutered: Set(seed.neutered),
            admitted_date: Set(days_ago(seed.admitted_days_ago)),
            released_date: Set(seed.released_days_ago.map(days_ago)),
            status: Set(seed.status),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await?;
    }

    for (index, seed) in SEED_CATS.iter().enumerate() {
        cats::ActiveModel {
            id: Set(Id::new_v4()),
            name: Set(seed.name.to_owned()),
            size: Set(seed.size),
            birth_date: Set(seed.age_days.map(days_ago)),
            sex: Set(seed.sex.map(str::to_owned)),
            neutered: Set(seed.neutered),
            admitted_date: Set(days_ago(seed.admitted_days_ago)),
            released_date: Set(seed.released_days_ago.map(days_ago)),
            status: Set(seed.status),
            indoor_only: Set(index % 2 == 0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}
