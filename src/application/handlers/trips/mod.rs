//! Trip planning handlers: CRUD plus saved search results.

mod create_trip;
mod delete_trip;
mod get_trip;
mod saved_items;
mod update_trip;

pub use create_trip::{CreateTripCommand, CreateTripHandler};
pub use delete_trip::DeleteTripHandler;
pub use get_trip::{GetTripHandler, ListTripsHandler};
pub use saved_items::{
    NewSavedItem, RemoveSavedItemCommand, SaveItemCommand, SavedItemKey, SavedItemsHandler,
};
pub use update_trip::{UpdateTripCommand, UpdateTripHandler};

use crate::application::AppError;
use crate::domain::foundation::{OwnedByUser, TripId, UserId};
use crate::domain::trip::Trip;
use crate::ports::TripRepository;

const TRIP_NOT_FOUND: &str = "Trip not found";

/// What the caller wants to do with a trip they may not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TripAccess {
    Read,
    Update,
    Delete,
    Modify,
}

/// Loads a trip and refuses callers other than its owner.
async fn load_owned(
    trips: &dyn TripRepository,
    trip_id: &TripId,
    user_id: &UserId,
    access: TripAccess,
) -> Result<Trip, AppError> {
    let trip = trips
        .find_by_id(trip_id)
        .await?
        .ok_or_else(|| AppError::not_found(TRIP_NOT_FOUND))?;

    let action = match access {
        TripAccess::Read => {
            if !trip.is_owner(user_id) {
                return Err(AppError::Forbidden("User not authorized for this trip".into()));
            }
            return Ok(trip);
        }
        TripAccess::Update => "update",
        TripAccess::Delete => "delete",
        TripAccess::Modify => "modify",
    };
    trip.check_ownership(user_id, action)?;
    Ok(trip)
}
