use async_trait::async_trait;
use farescout_core::models::{FlightRecord, LegQuery};
use farescout_core::repository::FlightRepository;
use farescout_core::CoreResult;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::{Collection, Database};
use serde::Deserialize;
use tracing::debug;

use crate::database::store_error;
use crate::{from_bson_date, to_bson_date};

pub const FLIGHTS_COLLECTION: &str = "flights";

// Field names follow the data loader's schema
#[derive(Debug, Deserialize)]
struct FlightDocument {
    srccity: String,
    destcity: String,
    date: bson::DateTime,
    airlinename: String,
    price: f64,
}

impl FlightDocument {
    fn into_record(self) -> CoreResult<FlightRecord> {
        Ok(FlightRecord {
            origin: self.srccity,
            destination: self.destcity,
            date: from_bson_date(self.date)?,
            airline: self.airlinename,
            price: self.price,
        })
    }
}

pub struct MongoFlightRepository {
    collection: Collection<FlightDocument>,
}

impl MongoFlightRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(FLIGHTS_COLLECTION),
        }
    }
}

/// Exact match on both cities and the departure day.
fn leg_filter(leg: &LegQuery) -> Document {
    doc! {
        "srccity": leg.origin.as_str(),
        "destcity": leg.destination.as_str(),
        "date": to_bson_date(leg.date),
    }
}

fn cheapest_first() -> Document {
    doc! { "price": 1 }
}

#[async_trait]
impl FlightRepository for MongoFlightRepository {
    async fn find_flights(&self, leg: &LegQuery) -> CoreResult<Vec<FlightRecord>> {
        let documents: Vec<FlightDocument> = self
            .collection
            .find(leg_filter(leg))
            .sort(cheapest_first())
            .await
            .map_err(store_error)?
            .try_collect()
            .await
            .map_err(store_error)?;

        debug!("{} flights {} -> {} on {}", documents.len(), leg.origin, leg.destination, leg.date);
        documents.into_iter().map(FlightDocument::into_record).collect()
    }
}
