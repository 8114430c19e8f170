//! SavedItemsHandler - attaches and detaches frozen search results.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::{
    AccommodationInput, ActivityInput, FlightInput, SavedAccommodation, SavedActivity, SavedFlight,
    Trip,
};
use crate::ports::TripRepository;

use super::{load_owned, TripAccess};

/// Client payload for one saved item.
#[derive(Debug, Clone)]
pub enum NewSavedItem {
    Flight(FlightInput),
    Accommodation(AccommodationInput),
    Activity(ActivityInput),
}

/// Natural key identifying a saved item within a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedItemKey {
    Flight {
        flight_api_id: String,
        departure_millis: i64,
    },
    Accommodation {
        accommodation_api_id: String,
        check_in_millis: i64,
    },
    Activity {
        activity_api_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct SaveItemCommand {
    pub user_id: UserId,
    pub trip_id: TripId,
    pub item: NewSavedItem,
}

#[derive(Debug, Clone)]
pub struct RemoveSavedItemCommand {
    pub user_id: UserId,
    pub trip_id: TripId,
    pub key: SavedItemKey,
}

/// Saves and removes flights, stays and activities on an owned trip.
///
/// Both operations return the updated trip; callers pick the list they
/// echo back.
pub struct SavedItemsHandler {
    trips: Arc<dyn TripRepository>,
}

impl SavedItemsHandler {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    pub async fn save(&self, cmd: SaveItemCommand) -> Result<Trip, AppError> {
        let mut trip =
            load_owned(self.trips.as_ref(), &cmd.trip_id, &cmd.user_id, TripAccess::Modify).await?;

        let kind = match cmd.item {
            NewSavedItem::Flight(input) => {
                trip.save_flight(SavedFlight::from_input(input)?)?;
                "flight"
            }
            NewSavedItem::Accommodation(input) => {
                trip.save_accommodation(SavedAccommodation::from_input(input)?)?;
                "accommodation"
            }
            NewSavedItem::Activity(input) => {
                trip.save_activity(SavedActivity::from_input(input)?)?;
                "activity"
            }
        };

        self.persist(trip, kind, "saved").await
    }

    pub async fn remove(&self, cmd: RemoveSavedItemCommand) -> Result<Trip, AppError> {
        let mut trip =
            load_owned(self.trips.as_ref(), &cmd.trip_id, &cmd.user_id, TripAccess::Modify).await?;

        let kind = match &cmd.key {
            SavedItemKey::Flight {
                flight_api_id,
                departure_millis,
            } => {
                trip.remove_flight(flight_api_id, *departure_millis)?;
                "flight"
            }
            SavedItemKey::Accommodation {
                accommodation_api_id,
                check_in_millis,
            } => {
                trip.remove_accommodation(accommodation_api_id, *check_in_millis)?;
                "accommodation"
            }
            SavedItemKey::Activity { activity_api_id } => {
                trip.remove_activity(activity_api_id)?;
                "activity"
            }
        };

        self.persist(trip, kind, "removed").await
    }

    async fn persist(&self, trip: Trip, kind: &str, verb: &str) -> Result<Trip, AppError> {
        self.trips.update(&trip).await?;
        info!(trip_id = %trip.id(), item = kind, "Saved {} {}", kind, verb);
        let version = trip.version() + 1;
        Ok(trip.with_version(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTripRepository;
    use crate::application::handlers::trips::fixtures::seed_trip;
    use serde_json::json;

    fn flight() -> FlightInput {
        FlightInput {
            flight_api_id: Some("kiwi-123".into()),
            origin: Some("JFK".into()),
            destination: Some("FCO".into()),
            departure_date: Some("2025-06-05T10:30:00Z".into()),
            price: Some(420.0),
            details: json!({"airline": "ITA"}),
        }
    }

    fn stay() -> AccommodationInput {
        AccommodationInput {
            accommodation_api_id: Some("airbnb-9".into()),
            name: Some("Trastevere loft".into()),
            check_in_date: Some("2025-06-05".into()),
            ..Default::default()
        }
    }

    async fn setup() -> (Arc<InMemoryTripRepository>, SavedItemsHandler, UserId, TripId) {
        let trips = Arc::new(InMemoryTripRepository::new());
        let owner = UserId::new();
        let trip = seed_trip(&trips, owner).await;
        let handler = SavedItemsHandler::new(trips.clone());
        (trips, handler, owner, *trip.id())
    }

    fn save(owner: UserId, trip_id: TripId, item: NewSavedItem) -> SaveItemCommand {
        SaveItemCommand {
            user_id: owner,
            trip_id,
            item,
        }
    }

    #[tokio::test]
    async fn saving_same_flight_twice_is_rejected_and_list_unchanged() {
        let (trips, handler, owner, trip_id) = setup().await;

        let trip = handler
            .save(save(owner, trip_id, NewSavedItem::Flight(flight())))
            .await
            .unwrap();
        assert_eq!(trip.saved_flights().len(), 1);

        let err = handler
            .save(save(owner, trip_id, NewSavedItem::Flight(flight())))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == "This specific flight is already saved to this trip."));
        let stored = trips.find_by_id(&trip_id).await.unwrap().unwrap();
        assert_eq!(stored.saved_flights().len(), 1);
    }

    #[tokio::test]
    async fn flight_missing_origin_is_bad_request() {
        let (_, handler, owner, trip_id) = setup().await;
        let mut input = flight();
        input.origin = None;

        let err = handler
            .save(save(owner, trip_id, NewSavedItem::Flight(input)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m)
            if m == "Missing required flight data (ID, origin, destination, departureDate)."));
    }

    #[tokio::test]
    async fn removes_flight_by_departure_millis() {
        let (_, handler, owner, trip_id) = setup().await;
        let trip = handler
            .save(save(owner, trip_id, NewSavedItem::Flight(flight())))
            .await
            .unwrap();
        let millis = trip.saved_flights()[0].departure_date.as_unix_millis();

        let trip = handler
            .remove(RemoveSavedItemCommand {
                user_id: owner,
                trip_id,
                key: SavedItemKey::Flight {
                    flight_api_id: "kiwi-123".into(),
                    departure_millis: millis,
                },
            })
            .await
            .unwrap();

        assert!(trip.saved_flights().is_empty());
    }

    #[tokio::test]
    async fn removing_unknown_accommodation_is_not_found() {
        let (_, handler, owner, trip_id) = setup().await;
        handler
            .save(save(owner, trip_id, NewSavedItem::Accommodation(stay())))
            .await
            .unwrap();

        let err = handler
            .remove(RemoveSavedItemCommand {
                user_id: owner,
                trip_id,
                key: SavedItemKey::Accommodation {
                    accommodation_api_id: "airbnb-9".into(),
                    check_in_millis: 0,
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m)
            if m == "Accommodation not found in this trip for the specified details."));
    }

    #[tokio::test]
    async fn activities_round_through_save_and_remove() {
        let (_, handler, owner, trip_id) = setup().await;
        let input = ActivityInput {
            activity_api_id: Some("place-1".into()),
            name: Some("Colosseum".into()),
            ..Default::default()
        };

        let trip = handler
            .save(save(owner, trip_id, NewSavedItem::Activity(input.clone())))
            .await
            .unwrap();
        assert_eq!(trip.saved_activities().len(), 1);

        let err = handler
            .save(save(owner, trip_id, NewSavedItem::Activity(input)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "This activity is already saved to this trip."));

        let trip = handler
            .remove(RemoveSavedItemCommand {
                user_id: owner,
                trip_id,
                key: SavedItemKey::Activity {
                    activity_api_id: "place-1".into(),
                },
            })
            .await
            .unwrap();
        assert!(trip.saved_activities().is_empty());
    }

    #[tokio::test]
    async fn stranger_cannot_save_items() {
        let (_, handler, _, trip_id) = setup().await;

        let err = handler
            .save(save(UserId::new(), trip_id, NewSavedItem::Flight(flight())))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
