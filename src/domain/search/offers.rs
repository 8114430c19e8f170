//! Normalised search results returned to clients.
//!
//! Each provider answers in its own schema; adapters reshape those answers
//! into these types. Missing upstream values become the documented
//! placeholders rather than errors.

use serde::Serialize;

pub const UNKNOWN_CITY: &str = "Unknown City";
pub const UNKNOWN_AIRPORT: &str = "Unknown Airport";
pub const UNKNOWN_AIRLINE: &str = "Unknown Airline";
pub const NOT_AVAILABLE: &str = "N/A";
pub const DURATION_NOT_AVAILABLE: &str = "Duration not available";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    pub price: Option<f64>,
    pub currency: String,
    pub departure_city: String,
    pub departure_airport: String,
    pub departure_airport_code: String,
    pub departure_time_local: Option<String>,
    #[serde(rename = "departureTimeUTC")]
    pub departure_time_utc: Option<String>,
    pub arrival_city: String,
    pub arrival_airport: String,
    pub arrival_airport_code: String,
    pub arrival_time_local: Option<String>,
    #[serde(rename = "arrivalTimeUTC")]
    pub arrival_time_utc: Option<String>,
    pub duration_in_seconds: Option<i64>,
    pub duration_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_trip_duration: Option<String>,
    pub airline_name: String,
    pub airline_code: String,
    pub flight_number: String,
    pub booking_link: Option<String>,
    pub provider: String,
    pub is_round_trip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_info: Option<ReturnInfo>,
    pub original_departure_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_return_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnInfo {
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationOffer {
    pub id: String,
    pub name: String,
    pub location: String,
    pub destination_city: String,
    pub price_per_night: Option<f64>,
    pub total_price: Option<f64>,
    pub currency: String,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub booking_link: String,
    pub provider: String,
    pub description: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub number_of_guests: u8,
    pub host: Option<HostSummary>,
    pub badges: Vec<String>,
}

impl AccommodationOffer {
    /// Entries without any of price, image or rating are not worth showing.
    pub fn has_useful_data(&self) -> bool {
        self.price_per_night.is_some() || self.image_url.is_some() || self.rating.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    pub name: Option<String>,
    pub is_superhost: Option<bool>,
    pub profile_picture: Option<String>,
    pub years_hosting: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResult {
    pub id: String,
    pub title: String,
    pub address: String,
    pub rating: Option<f64>,
    pub user_rating_count: u64,
    pub types: Vec<String>,
    pub primary_type: Option<String>,
    pub icon_background_color: Option<String>,
    pub icon_url: Option<String>,
    pub google_maps_uri: Option<String>,
    pub website_uri: Option<String>,
    pub first_photo_reference: Option<String>,
    pub image_url: Option<String>,
}

/// Formats a duration as `"Xh Ym"`, or `"Ym"` under an hour.
pub fn format_duration(total_seconds: Option<i64>) -> String {
    match total_seconds {
        Some(secs) if secs > 0 => {
            let hours = secs / 3600;
            let minutes = (secs % 3600) / 60;
            if hours > 0 {
                format!("{}h {}m", hours, minutes)
            } else {
                format!("{}m", minutes)
            }
        }
        _ => DURATION_NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(Some(9000)), "2h 30m");
        assert_eq!(format_duration(Some(7200)), "2h 0m");
        assert_eq!(format_duration(Some(300)), "5m");
        assert_eq!(format_duration(Some(0)), DURATION_NOT_AVAILABLE);
        assert_eq!(format_duration(None), DURATION_NOT_AVAILABLE);
    }

    #[test]
    fn flight_offer_uses_utc_suffix_in_json() {
        let offer = FlightOffer {
            id: "x".into(),
            price: None,
            currency: "USD".into(),
            departure_city: UNKNOWN_CITY.into(),
            departure_airport: UNKNOWN_AIRPORT.into(),
            departure_airport_code: NOT_AVAILABLE.into(),
            departure_time_local: None,
            departure_time_utc: Some("2025-06-10T08:00:00Z".into()),
            arrival_city: UNKNOWN_CITY.into(),
            arrival_airport: UNKNOWN_AIRPORT.into(),
            arrival_airport_code: NOT_AVAILABLE.into(),
            arrival_time_local: None,
            arrival_time_utc: None,
            duration_in_seconds: None,
            duration_formatted: DURATION_NOT_AVAILABLE.into(),
            total_trip_duration: None,
            airline_name: UNKNOWN_AIRLINE.into(),
            airline_code: NOT_AVAILABLE.into(),
            flight_number: NOT_AVAILABLE.into(),
            booking_link: None,
            provider: "Kiwi.com".into(),
            is_round_trip: false,
            return_info: None,
            original_departure_date: "2025-06-10".into(),
            original_return_date: None,
        };

        let json = serde_json::to_value(&offer).unwrap();
        assert_eq!(json["departureTimeUTC"], "2025-06-10T08:00:00Z");
        assert_eq!(json["isRoundTrip"], false);
        assert!(json.get("returnInfo").is_none());
    }
}
