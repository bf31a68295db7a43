use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One priced flight on a single day between two cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub airline: String,
    pub price: f64,
}

/// One priced night at a hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRate {
    pub city: String,
    pub date: NaiveDate,
    pub hotel_name: String,
    pub price: f64,
}

/// Hotel rates summed over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelStay {
    pub hotel_name: String,
    pub price: f64,
    pub nights: u32,
}

/// Exact-match lookup for one leg of a round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
}

impl LegQuery {
    pub fn new(origin: &str, destination: &str, date: NaiveDate) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date,
        }
    }

    /// The opposite direction, flown on `date`.
    pub fn reversed(&self, date: NaiveDate) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
            date,
        }
    }

    pub fn matches(&self, flight: &FlightRecord) -> bool {
        flight.origin == self.origin && flight.destination == self.destination && flight.date == self.date
    }
}

/// Range lookup for hotel rates, both bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayQuery {
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayQuery {
    pub fn covers(&self, rate: &HotelRate) -> bool {
        rate.city == self.city && rate.date >= self.check_in && rate.date <= self.check_out
    }
}
