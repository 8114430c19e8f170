use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, TripId, UserId};
use crate::domain::trip::Trip;
use crate::ports::TripRepository;

use super::{check_version, newest_first, Stored};

#[derive(Debug, Default)]
pub struct InMemoryTripRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    trips: HashMap<TripId, Stored<Trip>>,
    next_seq: u64,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn insert(&self, trip: &Trip) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.trips.contains_key(trip.id()) {
            return Err(DomainError::duplicate("id"));
        }
        state.next_seq += 1;
        let seq = state.next_seq;
        state.trips.insert(
            *trip.id(),
            Stored {
                doc: trip.clone(),
                seq,
            },
        );
        Ok(())
    }

    async fn update(&self, trip: &Trip) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .trips
            .get_mut(trip.id())
            .ok_or_else(|| DomainError::new(ErrorCode::TripNotFound, "Trip not found"))?;
        check_version("Trip", stored.doc.version(), trip.version())?;
        stored.doc = trip.clone().with_version(trip.version() + 1);
        Ok(())
    }

    async fn delete(&self, id: &TripId) -> Result<(), DomainError> {
        self.state.write().await.trips.remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        Ok(self.state.read().await.trips.get(id).map(|s| s.doc.clone()))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Trip>, DomainError> {
        let state = self.state.read().await;
        let rows = state
            .trips
            .values()
            .filter(|s| s.doc.user_id() == user_id)
            .collect();
        Ok(newest_first(rows, |t: &Trip| *t.created_at()))
    }
}
