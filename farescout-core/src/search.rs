use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::models::{FlightRecord, HotelRate, HotelStay, LegQuery, StayQuery};
use crate::repository::{FlightRepository, HotelRepository};
use crate::{CoreError, CoreResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripRequest {
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl RoundTripRequest {
    pub fn parse(
        destination: Option<&str>,
        departure_date: Option<&str>,
        return_date: Option<&str>,
    ) -> CoreResult<Self> {
        let destination = require_city("destination", destination)?;
        let departure_date = parse_date("departureDate", departure_date)?;
        let return_date = parse_date("returnDate", return_date)?;

        if return_date < departure_date {
            return Err(CoreError::ValidationError(
                "returnDate must not be before departureDate".to_string(),
            ));
        }

        Ok(Self { destination, departure_date, return_date })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayRequest {
    pub destination: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

impl StayRequest {
    pub fn parse(
        destination: Option<&str>,
        check_in_date: Option<&str>,
        check_out_date: Option<&str>,
    ) -> CoreResult<Self> {
        let destination = require_city("destination", destination)?;
        let check_in_date = parse_date("checkInDate", check_in_date)?;
        let check_out_date = parse_date("checkOutDate", check_out_date)?;

        if check_in_date > check_out_date {
            return Err(CoreError::ValidationError(
                "checkInDate must not be after checkOutDate".to_string(),
            ));
        }

        Ok(Self { destination, check_in_date, check_out_date })
    }

    pub fn query(&self) -> StayQuery {
        StayQuery {
            city: self.destination.clone(),
            check_in: self.check_in_date,
            check_out: self.check_out_date,
        }
    }
}

fn require_city(name: &str, value: Option<&str>) -> CoreResult<String> {
    match value.map(str::trim) {
        Some(city) if !city.is_empty() => Ok(city.to_string()),
        _ => Err(CoreError::ValidationError(format!("{} is required", name))),
    }
}

fn parse_date(name: &str, value: Option<&str>) -> CoreResult<NaiveDate> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::ValidationError(format!("{} is required", name)))?;

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        CoreError::ValidationError(format!("{} must be a date in YYYY-MM-DD format, got '{}'", name, raw))
    })
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripOption {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Departure Date")]
    pub departure_date: NaiveDate,
    #[serde(rename = "Departure Airline")]
    pub departure_airline: String,
    #[serde(rename = "Departure Price", serialize_with = "serialize_price")]
    pub departure_price: f64,
    #[serde(rename = "Return Date")]
    pub return_date: NaiveDate,
    #[serde(rename = "Return Airline")]
    pub return_airline: String,
    #[serde(rename = "Return Price", serialize_with = "serialize_price")]
    pub return_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayOption {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Check In Date")]
    pub check_in_date: NaiveDate,
    #[serde(rename = "Check Out Date")]
    pub check_out_date: NaiveDate,
    #[serde(rename = "Hotel")]
    pub hotel: String,
    #[serde(rename = "Price", serialize_with = "serialize_price")]
    pub price: f64,
}

/// Whole amounts render as JSON integers, as the source data stores them.
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    if price.fract() == 0.0 && price.abs() <= MAX_EXACT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Every item priced at the minimum, in input order.
pub fn cheapest<T, F>(items: Vec<T>, price: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let min = items.iter().map(&price).fold(f64::INFINITY, f64::min);
    items.into_iter().filter(|item| price(item) == min).collect()
}

/// Groups rates covered by `query` per hotel and sums their prices.
/// Sorted ascending by total; equal totals keep hotel name order.
pub fn group_stays(rates: &[HotelRate], query: &StayQuery) -> Vec<HotelStay> {
    let mut totals: BTreeMap<&str, (f64, u32)> = BTreeMap::new();

    for rate in rates.iter().filter(|r| query.covers(r)) {
        let entry = totals.entry(rate.hotel_name.as_str()).or_insert((0.0, 0));
        entry.0 += rate.price;
        entry.1 += 1;
    }

    let mut stays: Vec<HotelStay> = totals
        .into_iter()
        .map(|(name, (price, nights))| HotelStay {
            hotel_name: name.to_string(),
            price,
            nights,
        })
        .collect();

    stays.sort_by(|a, b| a.price.total_cmp(&b.price));
    stays
}

fn pair_legs(request: &RoundTripRequest, outbound: &[FlightRecord], inbound: &[FlightRecord]) -> Vec<RoundTripOption> {
    outbound
        .iter()
        .flat_map(|dep| {
            inbound.iter().map(move |ret| RoundTripOption {
                city: request.destination.clone(),
                departure_date: request.departure_date,
                departure_airline: dep.airline.clone(),
                departure_price: dep.price,
                return_date: request.return_date,
                return_airline: ret.airline.clone(),
                return_price: ret.price,
            })
        })
        .collect()
}

// ============================================================================
// Service
// ============================================================================

/// Cheapest round trip and hotel stay lookups over the repositories.
#[derive(Clone)]
pub struct TravelSearch {
    flights: Arc<dyn FlightRepository>,
    hotels: Arc<dyn HotelRepository>,
    origin_city: String,
}

impl TravelSearch {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        hotels: Arc<dyn HotelRepository>,
        origin_city: impl Into<String>,
    ) -> Self {
        Self {
            flights,
            hotels,
            origin_city: origin_city.into(),
        }
    }

    /// Pairs every cheapest outbound flight with every cheapest return flight.
    pub async fn cheapest_round_trip(&self, request: &RoundTripRequest) -> CoreResult<Vec<RoundTripOption>> {
        let outbound_leg = LegQuery::new(&self.origin_city, &request.destination, request.departure_date);
        let outbound = cheapest(self.flights.find_flights(&outbound_leg).await?, |f| f.price);
        if outbound.is_empty() {
            info!("No departure flights {} -> {} on {}", outbound_leg.origin, outbound_leg.destination, outbound_leg.date);
            return Err(CoreError::NotFound("No departure flights found".to_string()));
        }

        let inbound_leg = outbound_leg.reversed(request.return_date);
        let inbound = cheapest(self.flights.find_flights(&inbound_leg).await?, |f| f.price);
        if inbound.is_empty() {
            info!("No return flights {} -> {} on {}", inbound_leg.origin, inbound_leg.destination, inbound_leg.date);
            return Err(CoreError::NotFound("No return flights found".to_string()));
        }

        debug!("{} outbound x {} return cheapest flights", outbound.len(), inbound.len());
        Ok(pair_legs(request, &outbound, &inbound))
    }

    pub async fn cheapest_stay(&self, request: &StayRequest) -> CoreResult<Vec<StayOption>> {
        let stays = cheapest(self.hotels.find_stays(&request.query()).await?, |s| s.price);
        if stays.is_empty() {
            info!(
                "No hotels in {} between {} and {}",
                request.destination, request.check_in_date, request.check_out_date
            );
            return Err(CoreError::NotFound("No hotels found".to_string()));
        }

        Ok(stays
            .into_iter()
            .map(|stay| StayOption {
                city: request.destination.clone(),
                check_in_date: request.check_in_date,
                check_out_date: request.check_out_date,
                hotel: stay.hotel_name,
                price: stay.price,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn flight(origin: &str, destination: &str, day: &str, airline: &str, price: f64) -> FlightRecord {
        FlightRecord {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: date(day),
            airline: airline.to_string(),
            price,
        }
    }

    fn rate(city: &str, day: &str, hotel: &str, price: f64) -> HotelRate {
        HotelRate {
            city: city.to_string(),
            date: date(day),
            hotel_name: hotel.to_string(),
            price,
        }
    }

    struct StubFlights {
        flights: Vec<FlightRecord>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FlightRepository for StubFlights {
        async fn find_flights(&self, leg: &LegQuery) -> CoreResult<Vec<FlightRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.flights.iter().filter(|f| leg.matches(f)).cloned().collect())
        }
    }

    struct StubHotels(Vec<HotelRate>);

    #[async_trait]
    impl HotelRepository for StubHotels {
        async fn find_stays(&self, query: &StayQuery) -> CoreResult<Vec<HotelStay>> {
            Ok(group_stays(&self.0, query))
        }
    }

    fn search(flights: Vec<FlightRecord>, rates: Vec<HotelRate>) -> (TravelSearch, Arc<StubFlights>) {
        let stub = Arc::new(StubFlights { flights, calls: AtomicUsize::new(0) });
        let search = TravelSearch::new(stub.clone(), Arc::new(StubHotels(rates)), "Singapore");
        (search, stub)
    }

    #[test]
    fn test_round_trip_request_parsing() {
        let req = RoundTripRequest::parse(Some(" Bangkok "), Some("2024-03-01"), Some("2024-03-10")).unwrap();
        assert_eq!(req.destination, "Bangkok");
        assert_eq!(req.departure_date, date("2024-03-01"));
        assert_eq!(req.return_date, date("2024-03-10"));
    }

    #[test]
    fn test_round_trip_request_rejects_bad_input() {
        let cases = [
            (None, Some("2024-03-01"), Some("2024-03-10")),
            (Some("  "), Some("2024-03-01"), Some("2024-03-10")),
            (Some("Bangkok"), Some("01/03/2024"), Some("2024-03-10")),
            (Some("Bangkok"), Some("2024-03-01"), None),
            (Some("Bangkok"), Some("2024-02-30"), Some("2024-03-10")),
            (Some("Bangkok"), Some("2024-03-10"), Some("2024-03-01")),
        ];

        for (destination, departure, ret) in cases {
            let result = RoundTripRequest::parse(destination, departure, ret);
            assert!(
                matches!(result, Err(CoreError::ValidationError(_))),
                "expected validation error for {:?}",
                (destination, departure, ret)
            );
        }
    }

    #[test]
    fn test_stay_request_allows_single_day_and_rejects_inverted_range() {
        let req = StayRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("2024-03-01")).unwrap();
        assert_eq!(req.check_in_date, req.check_out_date);

        let err = StayRequest::parse(Some("Bangkok"), Some("2024-03-03"), Some("2024-03-01")).unwrap_err();
        assert!(err.to_string().contains("checkInDate"));
    }

    #[test]
    fn test_parse_error_names_parameter() {
        let err = StayRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("tomorrow")).unwrap_err();
        assert!(err.to_string().contains("checkOutDate"));
        assert!(err.to_string().contains("tomorrow"));
    }

    #[test]
    fn test_cheapest_keeps_all_ties_in_order() {
        let picked = cheapest(vec![("b", 80.0), ("a", 120.0), ("c", 80.0)], |x| x.1);
        assert_eq!(picked, vec![("b", 80.0), ("c", 80.0)]);

        let none: Vec<(&str, f64)> = cheapest(Vec::new(), |x: &(&str, f64)| x.1);
        assert!(none.is_empty());
    }

    #[test]
    fn test_group_stays_sums_and_sorts() {
        let rates = vec![
            rate("Bangkok", "2024-03-01", "Hotel B", 70.0),
            rate("Bangkok", "2024-03-01", "Hotel A", 50.0),
            rate("Bangkok", "2024-03-02", "Hotel A", 50.0),
            rate("Bangkok", "2024-03-02", "Hotel B", 70.0),
            rate("Bangkok", "2024-03-05", "Hotel A", 999.0),
            rate("Tokyo", "2024-03-01", "Hotel A", 1.0),
        ];
        let query = StayQuery {
            city: "Bangkok".to_string(),
            check_in: date("2024-03-01"),
            check_out: date("2024-03-03"),
        };

        let stays = group_stays(&rates, &query);
        assert_eq!(stays.len(), 2);
        assert_eq!(stays[0], HotelStay { hotel_name: "Hotel A".to_string(), price: 100.0, nights: 2 });
        assert_eq!(stays[1].hotel_name, "Hotel B");
        assert_eq!(stays[1].price, 140.0);
    }

    #[tokio::test]
    async fn test_round_trip_scenario() {
        let (search, _) = search(
            vec![
                flight("Singapore", "Bangkok", "2024-03-01", "Scoot", 100.0),
                flight("Bangkok", "Singapore", "2024-03-10", "Thai", 80.0),
            ],
            vec![],
        );
        let req = RoundTripRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("2024-03-10")).unwrap();

        let options = search.cheapest_round_trip(&req).await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].departure_price, 100.0);
        assert_eq!(options[0].return_price, 80.0);
        assert_eq!(options[0].departure_airline, "Scoot");
        assert_eq!(options[0].return_airline, "Thai");
    }

    #[tokio::test]
    async fn test_round_trip_ties_form_cartesian_product() {
        let (search, _) = search(
            vec![
                flight("Singapore", "Bangkok", "2024-03-01", "Scoot", 100.0),
                flight("Singapore", "Bangkok", "2024-03-01", "AirAsia", 100.0),
                flight("Singapore", "Bangkok", "2024-03-01", "SQ", 300.0),
                flight("Bangkok", "Singapore", "2024-03-10", "Thai", 80.0),
                flight("Bangkok", "Singapore", "2024-03-10", "Jetstar", 80.0),
            ],
            vec![],
        );
        let req = RoundTripRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("2024-03-10")).unwrap();

        let options = search.cheapest_round_trip(&req).await.unwrap();
        let pairs: Vec<(&str, &str)> = options
            .iter()
            .map(|o| (o.departure_airline.as_str(), o.return_airline.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("Scoot", "Thai"), ("Scoot", "Jetstar"), ("AirAsia", "Thai"), ("AirAsia", "Jetstar")]
        );
    }

    #[tokio::test]
    async fn test_missing_outbound_skips_return_lookup() {
        let (search, stub) = search(vec![flight("Bangkok", "Singapore", "2024-03-10", "Thai", 80.0)], vec![]);
        let req = RoundTripRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("2024-03-10")).unwrap();

        let err = search.cheapest_round_trip(&req).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(ref msg) if msg == "No departure flights found"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_return_is_not_found() {
        let (search, _) = search(vec![flight("Singapore", "Bangkok", "2024-03-01", "Scoot", 100.0)], vec![]);
        let req = RoundTripRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("2024-03-10")).unwrap();

        let err = search.cheapest_round_trip(&req).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(ref msg) if msg == "No return flights found"));
    }

    #[tokio::test]
    async fn test_stay_scenario() {
        let (search, _) = search(
            vec![],
            vec![
                rate("Bangkok", "2024-03-01", "Hotel A", 50.0),
                rate("Bangkok", "2024-03-02", "Hotel A", 50.0),
                rate("Bangkok", "2024-03-01", "Hotel B", 90.0),
                rate("Bangkok", "2024-03-02", "Hotel B", 90.0),
            ],
        );
        let req = StayRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("2024-03-03")).unwrap();

        let options = search.cheapest_stay(&req).await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].hotel, "Hotel A");
        assert_eq!(options[0].price, 100.0);
    }

    #[tokio::test]
    async fn test_stay_without_rates_is_not_found() {
        let (search, _) = search(vec![], vec![rate("Tokyo", "2024-03-01", "Hotel A", 50.0)]);
        let req = StayRequest::parse(Some("Bangkok"), Some("2024-03-01"), Some("2024-03-03")).unwrap();

        assert!(matches!(search.cheapest_stay(&req).await, Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_option_serialization_uses_display_keys() {
        let option = StayOption {
            city: "Bangkok".to_string(),
            check_in_date: date("2024-03-01"),
            check_out_date: date("2024-03-03"),
            hotel: "Hotel A".to_string(),
            price: 100.0,
        };
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["Check In Date"], "2024-03-01");
        assert_eq!(json["Hotel"], "Hotel A");
        assert_eq!(json["Price"], 100.0);
        assert!(json["Price"].is_i64());
    }

    #[test]
    fn test_fractional_prices_stay_decimal() {
        let option = RoundTripOption {
            city: "Bangkok".to_string(),
            departure_date: date("2024-03-01"),
            departure_airline: "Scoot".to_string(),
            departure_price: 99.5,
            return_date: date("2024-03-10"),
            return_airline: "Thai".to_string(),
            return_price: 80.0,
        };
        let json = serde_json::to_string(&option).unwrap();
        assert!(json.contains(r#""Departure Price":99.5"#));
        assert!(json.ends_with(r#""Return Price":80}"#));
    }
}
