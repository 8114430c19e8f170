//! Trip read handlers.

use std::sync::Arc;

use crate::application::AppError;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::Trip;
use crate::ports::TripRepository;

use super::{load_owned, TripAccess};

/// Returns one trip to its owner.
pub struct GetTripHandler {
    trips: Arc<dyn TripRepository>,
}

impl GetTripHandler {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    pub async fn handle(&self, user_id: UserId, trip_id: TripId) -> Result<Trip, AppError> {
        load_owned(self.trips.as_ref(), &trip_id, &user_id, TripAccess::Read).await
    }
}

/// Lists the caller's trips, newest first.
pub struct ListTripsHandler {
    trips: Arc<dyn TripRepository>,
}

impl ListTripsHandler {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<Vec<Trip>, AppError> {
        Ok(self.trips.list_by_user(&user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTripRepository;
    use crate::application::handlers::trips::fixtures::seed_trip;

    #[tokio::test]
    async fn owner_reads_trip() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let owner = UserId::new();
        let trip = seed_trip(&trips, owner).await;

        let found = GetTripHandler::new(trips).handle(owner, *trip.id()).await.unwrap();

        assert_eq!(found.id(), trip.id());
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let trip = seed_trip(&trips, UserId::new()).await;

        let err = GetTripHandler::new(trips)
            .handle(UserId::new(), *trip.id())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(ref m) if m == "User not authorized for this trip"));
    }

    #[tokio::test]
    async fn missing_trip_is_not_found() {
        let trips = Arc::new(InMemoryTripRepository::new());

        let err = GetTripHandler::new(trips)
            .handle(UserId::new(), TripId::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m) if m == "Trip not found"));
    }

    #[tokio::test]
    async fn lists_only_callers_trips() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let owner = UserId::new();
        seed_trip(&trips, owner).await;
        seed_trip(&trips, owner).await;
        seed_trip(&trips, UserId::new()).await;

        let mine = ListTripsHandler::new(trips).handle(owner).await.unwrap();

        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.user_id() == &owner));
    }
}
