//! Frozen snapshots of search results attached to a trip.
//!
//! Items are copied from a search response when saved and never refreshed
//! from the upstream provider afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{DomainError, Timestamp};

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_date(value: &Option<String>) -> Option<Timestamp> {
    value.as_deref().and_then(Timestamp::parse_iso)
}

// ════════════════════════════════════════════════════════════════════════════
// Flights
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFlight {
    pub flight_api_id: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: Timestamp,
    pub price: Option<f64>,
    #[serde(default)]
    pub details: Value,
}

/// Client payload for saving a flight.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightInput {
    pub flight_api_id: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub details: Value,
}

impl SavedFlight {
    pub fn from_input(input: FlightInput) -> Result<Self, DomainError> {
        let missing = || {
            DomainError::rule("Missing required flight data (ID, origin, destination, departureDate).")
        };
        Ok(Self {
            flight_api_id: present(&input.flight_api_id).ok_or_else(missing)?,
            origin: present(&input.origin).ok_or_else(missing)?,
            destination: present(&input.destination).ok_or_else(missing)?,
            departure_date: parse_date(&input.departure_date).ok_or_else(missing)?,
            price: input.price,
            details: input.details,
        })
    }

    pub fn matches(&self, flight_api_id: &str, departure_millis: i64) -> bool {
        self.flight_api_id == flight_api_id && self.departure_date.as_unix_millis() == departure_millis
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Accommodations
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAccommodation {
    pub accommodation_api_id: String,
    pub name: String,
    pub location: Option<String>,
    pub destination_city: Option<String>,
    pub check_in_date: Timestamp,
    pub check_out_date: Option<Timestamp>,
    pub price_per_night: Option<f64>,
    pub total_price: Option<f64>,
    pub currency: Option<String>,
    pub number_of_guests: Option<u32>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub booking_link: Option<String>,
    pub provider: Option<String>,
    #[serde(default)]
    pub details: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationInput {
    pub accommodation_api_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub destination_city: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub price_per_night: Option<f64>,
    pub total_price: Option<f64>,
    pub currency: Option<String>,
    pub number_of_guests: Option<u32>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub booking_link: Option<String>,
    pub provider: Option<String>,
    #[serde(default)]
    pub details: Value,
}

impl SavedAccommodation {
    pub fn from_input(input: AccommodationInput) -> Result<Self, DomainError> {
        let missing = || DomainError::rule("Missing required accommodation data (ID and name).");
        let accommodation_api_id = present(&input.accommodation_api_id).ok_or_else(missing)?;
        let name = present(&input.name).ok_or_else(missing)?;
        let check_in_date = parse_date(&input.check_in_date)
            .ok_or_else(|| DomainError::rule("Accommodation check-in date is required."))?;

        Ok(Self {
            accommodation_api_id,
            name,
            location: present(&input.location),
            destination_city: present(&input.destination_city),
            check_in_date,
            check_out_date: parse_date(&input.check_out_date),
            price_per_night: input.price_per_night,
            total_price: input.total_price,
            currency: present(&input.currency),
            number_of_guests: input.number_of_guests,
            rating: input.rating,
            image_url: present(&input.image_url),
            booking_link: present(&input.booking_link),
            provider: present(&input.provider),
            details: input.details,
        })
    }

    pub fn matches(&self, accommodation_api_id: &str, check_in_millis: i64) -> bool {
        self.accommodation_api_id == accommodation_api_id
            && self.check_in_date.as_unix_millis() == check_in_millis
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Activities
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedActivity {
    pub activity_api_id: String,
    pub name: String,
    pub location: Option<String>,
    pub date: Option<Timestamp>,
    #[serde(default)]
    pub details: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    pub activity_api_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub details: Value,
}

impl SavedActivity {
    pub fn from_input(input: ActivityInput) -> Result<Self, DomainError> {
        let missing = || DomainError::rule("Missing required activity data (ID and name).");
        Ok(Self {
            activity_api_id: present(&input.activity_api_id).ok_or_else(missing)?,
            name: present(&input.name).ok_or_else(missing)?,
            location: present(&input.location),
            date: parse_date(&input.date),
            details: input.details,
        })
    }

    fn same_slot(&self, other: &SavedActivity) -> bool {
        self.activity_api_id == other.activity_api_id && self.date == other.date
    }
}

pub(super) fn is_duplicate_activity(existing: &[SavedActivity], candidate: &SavedActivity) -> bool {
    existing.iter().any(|a| a.same_slot(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    fn flight_input() -> FlightInput {
        FlightInput {
            flight_api_id: Some("KIWI-1".into()),
            origin: Some("LIS".into()),
            destination: Some("BCN".into()),
            departure_date: Some("2025-06-10T08:30:00Z".into()),
            price: Some(89.5),
            details: json!({"airline": "TAP"}),
        }
    }

    #[test]
    fn flight_requires_key_fields() {
        let err = SavedFlight::from_input(FlightInput {
            origin: None,
            ..flight_input()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleViolation);
        assert_eq!(
            err.message,
            "Missing required flight data (ID, origin, destination, departureDate)."
        );
    }

    #[test]
    fn flight_matches_on_id_and_departure_millis() {
        let flight = SavedFlight::from_input(flight_input()).unwrap();
        let millis = flight.departure_date.as_unix_millis();
        assert!(flight.matches("KIWI-1", millis));
        assert!(!flight.matches("KIWI-1", millis + 1));
        assert!(!flight.matches("KIWI-2", millis));
    }

    #[test]
    fn accommodation_requires_check_in() {
        let err = SavedAccommodation::from_input(AccommodationInput {
            accommodation_api_id: Some("abnb-7".into()),
            name: Some("Loft".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "Accommodation check-in date is required.");
    }

    #[test]
    fn accommodation_requires_id_and_name() {
        let err = SavedAccommodation::from_input(AccommodationInput {
            name: Some("Loft".into()),
            check_in_date: Some("2025-06-10".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "Missing required accommodation data (ID and name).");
    }

    #[test]
    fn saved_flight_serializes_camel_case() {
        let flight = SavedFlight::from_input(flight_input()).unwrap();
        let value = serde_json::to_value(&flight).unwrap();
        assert_eq!(value["flightApiId"], "KIWI-1");
        assert_eq!(value["details"]["airline"], "TAP");
    }

    #[test]
    fn activity_duplicate_uses_id_and_date() {
        let a = SavedActivity::from_input(ActivityInput {
            activity_api_id: Some("place-1".into()),
            name: Some("Castle tour".into()),
            date: Some("2025-06-11".into()),
            ..Default::default()
        })
        .unwrap();
        let mut b = a.clone();
        assert!(is_duplicate_activity(&[a.clone()], &b));
        b.date = None;
        assert!(!is_duplicate_activity(&[a], &b));
    }
}
