use async_trait::async_trait;
use farescout_core::models::{HotelStay, StayQuery};
use farescout_core::repository::HotelRepository;
use farescout_core::{CoreError, CoreResult};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::Deserialize;
use tracing::debug;

use crate::database::store_error;
use crate::to_bson_date;

pub const HOTELS_COLLECTION: &str = "hotels";

#[derive(Debug, Deserialize)]
struct StayDocument {
    #[serde(rename = "_id")]
    hotel_name: String,
    price: f64,
    nights: i64,
}

impl StayDocument {
    fn into_stay(self) -> CoreResult<HotelStay> {
        let nights = u32::try_from(self.nights).map_err(|_| {
            CoreError::StoreError(format!("invalid night count {} for hotel '{}'", self.nights, self.hotel_name))
        })?;

        Ok(HotelStay {
            hotel_name: self.hotel_name,
            price: self.price,
            nights,
        })
    }
}

pub struct MongoHotelRepository {
    collection: Collection<Document>,
}

impl MongoHotelRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(HOTELS_COLLECTION),
        }
    }
}

/// Match on city and inclusive date range, sum per hotel, cheapest first.
fn stay_pipeline(query: &StayQuery) -> Vec<Document> {
    vec![
        doc! { "$match": {
            "city": query.city.as_str(),
            "date": { "$gte": to_bson_date(query.check_in), "$lte": to_bson_date(query.check_out) },
        }},
        doc! { "$group": {
            "_id": "$hotelName",
            "price": { "$sum": "$price" },
            "nights": { "$sum": 1 },
        }},
        doc! { "$sort": { "price": 1, "_id": 1 } },
    ]
}

#[async_trait]
impl HotelRepository for MongoHotelRepository {
    async fn find_stays(&self, query: &StayQuery) -> CoreResult<Vec<HotelStay>> {
        let documents: Vec<StayDocument> = self
            .collection
            .aggregate(stay_pipeline(query))
            .await
            .map_err(store_error)?
            .with_type::<StayDocument>()
            .try_collect()
            .await
            .map_err(store_error)?;

        debug!(
            "{} hotels in {} between {} and {}",
            documents.len(),
            query.city,
            query.check_in,
            query.check_out
        );

        documents.into_iter().map(StayDocument::into_stay).collect()
    }
}
