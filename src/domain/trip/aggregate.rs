//! Trip aggregate.

use crate::domain::foundation::{
    DomainError, ErrorCode, OwnedByUser, Timestamp, TripId, UserId, ValidationError,
};

use super::details::{TripDetails, TripUpdate};
use super::saved_items::{is_duplicate_activity, SavedAccommodation, SavedActivity, SavedFlight};

/// A planned trip owned by one user.
///
/// # Invariants
///
/// - `details.end_date` is strictly after `details.start_date`
/// - no two saved flights share `(flight_api_id, departure_date)`
/// - no two saved accommodations share `(accommodation_api_id, check_in_date)`
/// - only the owner may read or change the trip
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: TripId,
    user_id: UserId,
    details: TripDetails,
    saved_flights: Vec<SavedFlight>,
    saved_accommodations: Vec<SavedAccommodation>,
    saved_activities: Vec<SavedActivity>,
    created_at: Timestamp,
    updated_at: Timestamp,
    version: i64,
}

impl Trip {
    pub fn new(id: TripId, user_id: UserId, details: TripDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            details,
            saved_flights: Vec::new(),
            saved_accommodations: Vec::new(),
            saved_activities: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// Reconstitute a trip from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TripId,
        user_id: UserId,
        details: TripDetails,
        saved_flights: Vec<SavedFlight>,
        saved_accommodations: Vec<SavedAccommodation>,
        saved_activities: Vec<SavedActivity>,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            details,
            saved_flights,
            saved_accommodations,
            saved_activities,
            created_at,
            updated_at,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TripId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn details(&self) -> &TripDetails {
        &self.details
    }

    pub fn saved_flights(&self) -> &[SavedFlight] {
        &self.saved_flights
    }

    pub fn saved_accommodations(&self) -> &[SavedAccommodation] {
        &self.saved_accommodations
    }

    pub fn saved_activities(&self) -> &[SavedActivity] {
        &self.saved_activities
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Copy carrying the version a store assigned after a conditional write.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn update_details(&mut self, update: TripUpdate) -> Result<(), Vec<ValidationError>> {
        self.details = self.details.merge(update)?;
        self.touch();
        Ok(())
    }

    pub fn save_flight(&mut self, flight: SavedFlight) -> Result<(), DomainError> {
        let millis = flight.departure_date.as_unix_millis();
        if self
            .saved_flights
            .iter()
            .any(|f| f.matches(&flight.flight_api_id, millis))
        {
            return Err(DomainError::rule(
                "This specific flight is already saved to this trip.",
            ));
        }
        self.saved_flights.push(flight);
        self.touch();
        Ok(())
    }

    pub fn remove_flight(&mut self, flight_api_id: &str, departure_millis: i64) -> Result<(), DomainError> {
        let before = self.saved_flights.len();
        self.saved_flights
            .retain(|f| !f.matches(flight_api_id, departure_millis));
        if self.saved_flights.len() == before {
            return Err(DomainError::new(
                ErrorCode::SavedItemNotFound,
                "Flight not found in this trip for the specified details.",
            ));
        }
        self.touch();
        Ok(())
    }

    pub fn save_accommodation(&mut self, stay: SavedAccommodation) -> Result<(), DomainError> {
        let millis = stay.check_in_date.as_unix_millis();
        if self
            .saved_accommodations
            .iter()
            .any(|a| a.matches(&stay.accommodation_api_id, millis))
        {
            return Err(DomainError::rule(
                "This specific accommodation for these dates is already saved.",
            ));
        }
        self.saved_accommodations.push(stay);
        self.touch();
        Ok(())
    }

    pub fn remove_accommodation(
        &mut self,
        accommodation_api_id: &str,
        check_in_millis: i64,
    ) -> Result<(), DomainError> {
        let before = self.saved_accommodations.len();
        self.saved_accommodations
            .retain(|a| !a.matches(accommodation_api_id, check_in_millis));
        if self.saved_accommodations.len() == before {
            return Err(DomainError::new(
                ErrorCode::SavedItemNotFound,
                "Accommodation not found in this trip for the specified details.",
            ));
        }
        self.touch();
        Ok(())
    }

    pub fn save_activity(&mut self, activity: SavedActivity) -> Result<(), DomainError> {
        if is_duplicate_activity(&self.saved_activities, &activity) {
            return Err(DomainError::rule("This activity is already saved to this trip."));
        }
        self.saved_activities.push(activity);
        self.touch();
        Ok(())
    }

    /// Removes every saved slot of the given activity.
    pub fn remove_activity(&mut self, activity_api_id: &str) -> Result<(), DomainError> {
        let before = self.saved_activities.len();
        self.saved_activities
            .retain(|a| a.activity_api_id != activity_api_id);
        if self.saved_activities.len() == before {
            return Err(DomainError::new(
                ErrorCode::SavedItemNotFound,
                "Activity not found in this trip.",
            ));
        }
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByUser for Trip {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }

    fn resource_name(&self) -> &'static str {
        "trip"
    }
}
