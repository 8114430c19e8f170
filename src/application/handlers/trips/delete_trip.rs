//! DeleteTripHandler - removes a trip after the owner check.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{TripId, UserId};
use crate::ports::TripRepository;

use super::{load_owned, TripAccess};

pub struct DeleteTripHandler {
    trips: Arc<dyn TripRepository>,
}

impl DeleteTripHandler {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    pub async fn handle(&self, user_id: UserId, trip_id: TripId) -> Result<(), AppError> {
        load_owned(self.trips.as_ref(), &trip_id, &user_id, TripAccess::Delete).await?;
        self.trips.delete(&trip_id).await?;

        info!(trip_id = %trip_id, user_id = %user_id, "Trip deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTripRepository;
    use crate::application::handlers::trips::fixtures::seed_trip;

    #[tokio::test]
    async fn owner_deletes_trip() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let owner = UserId::new();
        let trip = seed_trip(&trips, owner).await;

        DeleteTripHandler::new(trips.clone())
            .handle(owner, *trip.id())
            .await
            .unwrap();

        assert!(trips.find_by_id(trip.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stranger_cannot_delete() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let trip = seed_trip(&trips, UserId::new()).await;

        let err = DeleteTripHandler::new(trips.clone())
            .handle(UserId::new(), *trip.id())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(ref m) if m == "User not authorized to delete this trip."));
        assert!(trips.find_by_id(trip.id()).await.unwrap().is_some());
    }
}
