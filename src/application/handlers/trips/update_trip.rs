//! UpdateTripHandler - partial edit of trip details by the owner.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::{Trip, TripUpdate};
use crate::ports::TripRepository;

use super::{load_owned, TripAccess};

#[derive(Debug, Clone)]
pub struct UpdateTripCommand {
    pub user_id: UserId,
    pub trip_id: TripId,
    pub update: TripUpdate,
}

pub struct UpdateTripHandler {
    trips: Arc<dyn TripRepository>,
}

impl UpdateTripHandler {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    /// Date ordering is re-checked on the merged result, so moving only the
    /// start date past the stored end date fails.
    pub async fn handle(&self, cmd: UpdateTripCommand) -> Result<Trip, AppError> {
        let mut trip =
            load_owned(self.trips.as_ref(), &cmd.trip_id, &cmd.user_id, TripAccess::Update).await?;

        trip.update_details(cmd.update)?;
        self.trips.update(&trip).await?;

        info!(trip_id = %cmd.trip_id, "Trip updated");
        let version = trip.version() + 1;
        Ok(trip.with_version(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTripRepository;
    use crate::application::handlers::trips::fixtures::seed_trip;

    #[tokio::test]
    async fn owner_updates_selected_fields() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let owner = UserId::new();
        let trip = seed_trip(&trips, owner).await;

        let updated = UpdateTripHandler::new(trips.clone())
            .handle(UpdateTripCommand {
                user_id: owner,
                trip_id: *trip.id(),
                update: TripUpdate {
                    notes: Some("Book the Vatican tour".into()),
                    budget: Some(1500.0),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.details().notes, "Book the Vatican tour");
        assert_eq!(updated.details().trip_name, "Summer in Rome");
        let stored = trips.find_by_id(trip.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), updated.version());
    }

    #[tokio::test]
    async fn stranger_cannot_update_and_trip_is_unchanged() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let trip = seed_trip(&trips, UserId::new()).await;

        let err = UpdateTripHandler::new(trips.clone())
            .handle(UpdateTripCommand {
                user_id: UserId::new(),
                trip_id: *trip.id(),
                update: TripUpdate {
                    trip_name: Some("Hijacked".into()),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(ref m) if m == "User not authorized to update this trip."));
        let stored = trips.find_by_id(trip.id()).await.unwrap().unwrap();
        assert_eq!(stored.details().trip_name, "Summer in Rome");
    }

    #[tokio::test]
    async fn merged_dates_are_revalidated() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let owner = UserId::new();
        let trip = seed_trip(&trips, owner).await;

        let err = UpdateTripHandler::new(trips)
            .handle(UpdateTripCommand {
                user_id: owner,
                trip_id: *trip.id(),
                update: TripUpdate {
                    start_date: Some("2025-07-01".into()),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref e) if e[0].field == "endDate"));
    }

    #[tokio::test]
    async fn stale_copy_loses_the_race() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let owner = UserId::new();
        let trip = seed_trip(&trips, owner).await;

        let mut first = trip.clone();
        first.update_details(TripUpdate {
            notes: Some("first".into()),
            ..Default::default()
        })
        .unwrap();
        trips.update(&first).await.unwrap();

        let mut stale = trip;
        stale
            .update_details(TripUpdate {
                notes: Some("second".into()),
                ..Default::default()
            })
            .unwrap();
        let err: AppError = trips.update(&stale).await.unwrap_err().into();

        assert!(matches!(err, AppError::ConcurrentModification(_)));
    }
}
