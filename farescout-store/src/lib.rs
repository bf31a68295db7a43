pub mod app_config;
pub mod database;
pub mod flight_repo;
pub mod hotel_repo;
pub mod memory_repo;

use chrono::{NaiveDate, NaiveTime};
use farescout_core::{CoreError, CoreResult};
use mongodb::bson;

pub use database::DbClient;
pub use flight_repo::MongoFlightRepository;
pub use hotel_repo::MongoHotelRepository;
pub use memory_repo::InMemoryStore;

/// Dates are stored as BSON datetimes at midnight UTC.
pub(crate) fn to_bson_date(date: NaiveDate) -> bson::DateTime {
    bson::DateTime::from_millis(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

pub(crate) fn from_bson_date(value: bson::DateTime) -> CoreResult<NaiveDate> {
    chrono::DateTime::from_timestamp_millis(value.timestamp_millis())
        .map(|dt| dt.date_naive())
        .ok_or_else(|| CoreError::StoreError(format!("stored date out of range: {}", value)))
}
