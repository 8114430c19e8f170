//! CreateTripHandler - validates a draft and stores a new trip.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::{Trip, TripDetails, TripDraft};
use crate::ports::TripRepository;

#[derive(Debug, Clone)]
pub struct CreateTripCommand {
    pub user_id: UserId,
    pub draft: TripDraft,
}

pub struct CreateTripHandler {
    trips: Arc<dyn TripRepository>,
}

impl CreateTripHandler {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    pub async fn handle(&self, cmd: CreateTripCommand) -> Result<Trip, AppError> {
        let details = TripDetails::from_draft(cmd.draft)?;
        let trip = Trip::new(TripId::new(), cmd.user_id, details);
        self.trips.insert(&trip).await?;

        info!(trip_id = %trip.id(), user_id = %cmd.user_id, "Trip created");
        Ok(trip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTripRepository;
    use crate::application::handlers::trips::fixtures::draft;

    #[tokio::test]
    async fn stores_trip_for_owner_with_defaults() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let handler = CreateTripHandler::new(trips.clone());
        let owner = UserId::new();

        let trip = handler
            .handle(CreateTripCommand {
                user_id: owner,
                draft: draft("Rome"),
            })
            .await
            .unwrap();

        assert_eq!(trip.user_id(), &owner);
        assert!(!trip.details().is_public);
        assert_eq!(trip.details().budget, 0.0);
        assert_eq!(trips.list_by_user(&owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn end_before_start_is_a_field_error_on_end_date() {
        let trips = Arc::new(InMemoryTripRepository::new());
        let handler = CreateTripHandler::new(trips.clone());
        let owner = UserId::new();
        let mut draft = draft("Rome");
        draft.start_date = Some("2025-06-10".into());
        draft.end_date = Some("2025-06-05".into());

        let err = handler
            .handle(CreateTripCommand {
                user_id: owner,
                draft,
            })
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "endDate");
                assert_eq!(errors[0].msg, "End date must be after start date");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(trips.list_by_user(&owner).await.unwrap().is_empty());
    }
}
