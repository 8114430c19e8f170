//! Request and response bodies for trip endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, TripId, UserId};
use crate::domain::trip::{SavedAccommodation, SavedActivity, SavedFlight, Trip, TripDraft, TripUpdate};

/// Trip header fields. Create requires the mandatory ones; update treats
/// every field as optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub trip_name: Option<String>,
    pub destination_city: Option<String>,
    pub destination_country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub is_public: Option<bool>,
    pub budget: Option<f64>,
}

impl From<TripRequest> for TripDraft {
    fn from(req: TripRequest) -> Self {
        TripDraft {
            trip_name: req.trip_name,
            destination_city: req.destination_city,
            destination_country: req.destination_country,
            start_date: req.start_date,
            end_date: req.end_date,
            notes: req.notes,
            is_public: req.is_public,
            budget: req.budget,
        }
    }
}

impl From<TripRequest> for TripUpdate {
    fn from(req: TripRequest) -> Self {
        TripUpdate {
            trip_name: req.trip_name,
            destination_city: req.destination_city,
            destination_country: req.destination_country,
            start_date: req.start_date,
            end_date: req.end_date,
            notes: req.notes,
            is_public: req.is_public,
            budget: req.budget,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: TripId,
    pub user: UserId,
    pub trip_name: String,
    pub destination_city: String,
    pub destination_country: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub notes: String,
    pub is_public: bool,
    pub budget: f64,
    pub saved_flights: Vec<SavedFlight>,
    pub saved_accommodations: Vec<SavedAccommodation>,
    pub saved_activities: Vec<SavedActivity>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Trip> for TripResponse {
    fn from(trip: &Trip) -> Self {
        let details = trip.details();
        Self {
            id: *trip.id(),
            user: *trip.user_id(),
            trip_name: details.trip_name.clone(),
            destination_city: details.destination_city.clone(),
            destination_country: details.destination_country.clone(),
            start_date: details.start_date,
            end_date: details.end_date,
            notes: details.notes.clone(),
            is_public: details.is_public,
            budget: details.budget,
            saved_flights: trip.saved_flights().to_vec(),
            saved_accommodations: trip.saved_accommodations().to_vec(),
            saved_activities: trip.saved_activities().to_vec(),
            created_at: *trip.created_at(),
            updated_at: *trip.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_request_reads_camel_case() {
        let req: TripRequest = serde_json::from_str(
            r#"{"tripName":"Rome","destinationCity":"Rome","startDate":"2025-06-05","isPublic":true}"#,
        )
        .unwrap();

        let draft = TripDraft::from(req);

        assert_eq!(draft.trip_name.as_deref(), Some("Rome"));
        assert_eq!(draft.start_date.as_deref(), Some("2025-06-05"));
        assert_eq!(draft.is_public, Some(true));
        assert!(draft.destination_country.is_none());
    }
}
