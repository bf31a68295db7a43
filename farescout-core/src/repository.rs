use async_trait::async_trait;

use crate::models::{FlightRecord, HotelStay, LegQuery, StayQuery};
use crate::CoreResult;

/// Read access to the flight collection
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// Every flight matching origin, destination and date exactly.
    async fn find_flights(&self, leg: &LegQuery) -> CoreResult<Vec<FlightRecord>>;
}

/// Read access to the hotel rate collection
#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// Rates in the query range grouped per hotel, cheapest first.
    async fn find_stays(&self, query: &StayQuery) -> CoreResult<Vec<HotelStay>>;
}

/// Readiness probe for the backing store
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> CoreResult<()>;
}
