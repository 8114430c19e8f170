//! Validated search queries.
//!
//! Raw query-string values are turned into typed queries here so adapters
//! only ever see well-formed dates and passenger counts.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::foundation::ValidationError;

pub const MAX_FLIGHT_ADULTS: u8 = 9;
pub const MAX_ACCOMMODATION_ADULTS: u8 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchQueryError {
    /// A required parameter is absent; carries the client message.
    #[error("{0}")]
    Missing(&'static str),

    #[error("invalid search parameters")]
    Invalid(Vec<ValidationError>),
}

/// Sort order accepted by the flight provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightSort {
    #[default]
    Price,
    Duration,
    Quality,
}

impl FlightSort {
    /// Unknown values fall back to price.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("DURATION") => FlightSort::Duration,
            Some("QUALITY") => FlightSort::Quality,
            _ => FlightSort::Price,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightSort::Price => "PRICE",
            FlightSort::Duration => "DURATION",
            FlightSort::Quality => "QUALITY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passengers {
    pub adults: u8,
    pub children: u8,
    pub infants: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: Passengers,
    pub max_stopovers: Option<u8>,
    pub sort_by: FlightSort,
}

impl FlightQuery {
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

/// Raw flight search parameters as received.
#[derive(Debug, Clone, Default)]
pub struct FlightParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<String>,
    pub children: Option<String>,
    pub infants: Option<String>,
    pub max_stopovers: Option<String>,
    pub sort_by: Option<String>,
}

impl TryFrom<FlightParams> for FlightQuery {
    type Error = SearchQueryError;

    fn try_from(params: FlightParams) -> Result<Self, Self::Error> {
        let (Some(origin), Some(destination), Some(departure)) = (
            present(params.origin),
            present(params.destination),
            present(params.departure_date),
        ) else {
            return Err(SearchQueryError::Missing(
                "Please provide origin, destination, and departure date.",
            ));
        };

        let mut errors = Vec::new();
        let departure_date = parse_date("departureDate", &departure, &mut errors);
        let return_date = present(params.return_date)
            .and_then(|raw| parse_date("returnDate", &raw, &mut errors));
        let passengers = parse_passengers(
            params.adults.as_deref(),
            params.children.as_deref(),
            params.infants.as_deref(),
            MAX_FLIGHT_ADULTS,
            &mut errors,
        );

        if let (Some(dep), Some(ret)) = (departure_date, return_date) {
            if ret < dep {
                errors.push(ValidationError::out_of_range(
                    "returnDate",
                    "Return date must not be before departure date",
                ));
            }
        }

        // Only 0, 1 and 2 are meaningful to the provider; anything else means no limit.
        let max_stopovers = params
            .max_stopovers
            .as_deref()
            .and_then(|s| s.trim().parse::<u8>().ok())
            .filter(|n| *n <= 2);

        match (departure_date, errors.is_empty()) {
            (Some(departure_date), true) => Ok(FlightQuery {
                origin,
                destination,
                departure_date,
                return_date,
                passengers,
                max_stopovers,
                sort_by: FlightSort::parse(params.sort_by.as_deref()),
            }),
            _ => Err(SearchQueryError::Invalid(errors)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccommodationQuery {
    pub destination_city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub passengers: Passengers,
    pub currency: String,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub min_bedrooms: Option<String>,
    pub amenities: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccommodationParams {
    pub destination_city: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub adults: Option<String>,
    pub children: Option<String>,
    pub infants: Option<String>,
    pub currency: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub min_bedrooms: Option<String>,
    pub amenities: Option<String>,
}

impl TryFrom<AccommodationParams> for AccommodationQuery {
    type Error = SearchQueryError;

    fn try_from(params: AccommodationParams) -> Result<Self, Self::Error> {
        let (Some(destination_city), Some(check_in), Some(check_out)) = (
            present(params.destination_city),
            present(params.check_in_date),
            present(params.check_out_date),
        ) else {
            return Err(SearchQueryError::Missing(
                "Please provide destination, check-in date, and check-out date.",
            ));
        };

        let mut errors = Vec::new();
        let check_in = parse_date("checkInDate", &check_in, &mut errors);
        let check_out = parse_date("checkOutDate", &check_out, &mut errors);
        let passengers = parse_passengers(
            params.adults.as_deref(),
            params.children.as_deref(),
            params.infants.as_deref(),
            MAX_ACCOMMODATION_ADULTS,
            &mut errors,
        );

        if let (Some(a), Some(b)) = (check_in, check_out) {
            if b <= a {
                errors.push(ValidationError::out_of_range(
                    "checkOutDate",
                    "Check-out date must be after check-in date",
                ));
            }
        }

        match (check_in, check_out) {
            (Some(check_in), Some(check_out)) if errors.is_empty() => Ok(AccommodationQuery {
                destination_city,
                check_in,
                check_out,
                passengers,
                currency: present(params.currency)
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or_else(|| "USD".to_string()),
                price_min: present(params.price_min),
                price_max: present(params.price_max),
                min_bedrooms: present(params.min_bedrooms),
                amenities: present(params.amenities),
            }),
            _ => Err(SearchQueryError::Invalid(errors)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    pub destination_city: String,
    pub search_term: Option<String>,
}

impl PlaceQuery {
    pub fn new(
        destination_city: Option<String>,
        search_term: Option<String>,
    ) -> Result<Self, SearchQueryError> {
        let destination_city = present(destination_city).ok_or(SearchQueryError::Missing(
            "Please provide destination city for event/place search.",
        ))?;
        Ok(Self {
            destination_city,
            search_term: present(search_term),
        })
    }

    /// Free-text query sent to the places provider.
    pub fn text_query(&self) -> String {
        match &self.search_term {
            Some(term) => format!("{} in {}", term, self.destination_city),
            None => format!("things to do in {}", self.destination_city),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(field: &str, raw: &str, errors: &mut Vec<ValidationError>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(ValidationError::invalid_format(
                field,
                format!("{} must be a valid date (YYYY-MM-DD)", field),
            ));
            None
        }
    }
}

fn parse_passengers(
    adults: Option<&str>,
    children: Option<&str>,
    infants: Option<&str>,
    max_adults: u8,
    errors: &mut Vec<ValidationError>,
) -> Passengers {
    let adults = match adults.map(str::trim).filter(|s| !s.is_empty()) {
        None => 1,
        Some(raw) => match raw.parse::<u8>() {
            Ok(n) if (1..=max_adults).contains(&n) => n,
            _ => {
                errors.push(ValidationError::out_of_range(
                    "adults",
                    format!("Adults must be between 1 and {}", max_adults),
                ));
                1
            }
        },
    };
    let mut count = |field: &str, raw: Option<&str>| -> u8 {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => 0,
            Some(raw) => raw.parse::<u8>().unwrap_or_else(|_| {
                errors.push(ValidationError::invalid_format(
                    field,
                    format!("{} must be a non-negative number", field),
                ));
                0
            }),
        }
    };
    let children = count("children", children);
    let infants = count("infants", infants);

    Passengers {
        adults,
        children,
        infants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight_params() -> FlightParams {
        FlightParams {
            origin: Some("LHR".into()),
            destination: Some("JFK".into()),
            departure_date: Some("2025-06-10".into()),
            ..Default::default()
        }
    }

    #[test]
    fn flight_defaults() {
        let query = FlightQuery::try_from(flight_params()).unwrap();
        assert_eq!(query.passengers, Passengers { adults: 1, children: 0, infants: 0 });
        assert_eq!(query.sort_by, FlightSort::Price);
        assert!(!query.is_round_trip());
        assert_eq!(query.max_stopovers, None);
    }

    #[test]
    fn flight_missing_origin_is_missing() {
        let mut params = flight_params();
        params.origin = Some("   ".into());
        assert_eq!(
            FlightQuery::try_from(params),
            Err(SearchQueryError::Missing(
                "Please provide origin, destination, and departure date."
            ))
        );
    }

    #[test]
    fn flight_rejects_bad_date_and_adults() {
        let mut params = flight_params();
        params.departure_date = Some("10/06/2025".into());
        params.adults = Some("12".into());

        let Err(SearchQueryError::Invalid(errors)) = FlightQuery::try_from(params) else {
            panic!("expected invalid");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["departureDate", "adults"]);
    }

    #[test]
    fn flight_sort_and_stopovers() {
        let mut params = flight_params();
        params.sort_by = Some("quality".into());
        params.max_stopovers = Some("1".into());
        let query = FlightQuery::try_from(params).unwrap();
        assert_eq!(query.sort_by, FlightSort::Quality);
        assert_eq!(query.max_stopovers, Some(1));

        let mut params = flight_params();
        params.sort_by = Some("cheapest".into());
        params.max_stopovers = Some("5".into());
        let query = FlightQuery::try_from(params).unwrap();
        assert_eq!(query.sort_by, FlightSort::Price);
        assert_eq!(query.max_stopovers, None);
    }

    #[test]
    fn accommodation_requires_all_three() {
        let params = AccommodationParams {
            destination_city: Some("Lisbon".into()),
            check_in_date: Some("2025-06-10".into()),
            ..Default::default()
        };
        assert!(matches!(
            AccommodationQuery::try_from(params),
            Err(SearchQueryError::Missing(_))
        ));
    }

    #[test]
    fn accommodation_checkout_must_follow_checkin() {
        let params = AccommodationParams {
            destination_city: Some("Lisbon".into()),
            check_in_date: Some("2025-06-10".into()),
            check_out_date: Some("2025-06-10".into()),
            ..Default::default()
        };
        assert!(matches!(
            AccommodationQuery::try_from(params),
            Err(SearchQueryError::Invalid(_))
        ));
    }

    #[test]
    fn accommodation_defaults_currency() {
        let params = AccommodationParams {
            destination_city: Some("Lisbon".into()),
            check_in_date: Some("2025-06-10".into()),
            check_out_date: Some("2025-06-14".into()),
            adults: Some("16".into()),
            ..Default::default()
        };
        let query = AccommodationQuery::try_from(params).unwrap();
        assert_eq!(query.currency, "USD");
        assert_eq!(query.passengers.adults, 16);
    }

    #[test]
    fn place_text_query() {
        let q = PlaceQuery::new(Some("Rome".into()), None).unwrap();
        assert_eq!(q.text_query(), "things to do in Rome");

        let q = PlaceQuery::new(Some("Rome".into()), Some("museums".into())).unwrap();
        assert_eq!(q.text_query(), "museums in Rome");

        assert!(PlaceQuery::new(None, Some("museums".into())).is_err());
    }
}
