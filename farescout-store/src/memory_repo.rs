use async_trait::async_trait;
use farescout_core::models::{FlightRecord, HotelRate, HotelStay, LegQuery, StayQuery};
use farescout_core::repository::{FlightRepository, HealthCheck, HotelRepository};
use farescout_core::search::group_stays;
use farescout_core::CoreResult;

/// Store held in process memory. Answers queries the same way the
/// MongoDB repositories do.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    flights: Vec<FlightRecord>,
    rates: Vec<HotelRate>,
}

impl InMemoryStore {
    pub fn new(flights: Vec<FlightRecord>, rates: Vec<HotelRate>) -> Self {
        Self { flights, rates }
    }
}

#[async_trait]
impl FlightRepository for InMemoryStore {
    async fn find_flights(&self, leg: &LegQuery) -> CoreResult<Vec<FlightRecord>> {
        let mut flights: Vec<FlightRecord> = self.flights.iter().filter(|f| leg.matches(f)).cloned().collect();
        flights.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(flights)
    }
}

#[async_trait]
impl HotelRepository for InMemoryStore {
    async fn find_stays(&self, query: &StayQuery) -> CoreResult<Vec<HotelStay>> {
        Ok(group_stays(&self.rates, query))
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }
}
