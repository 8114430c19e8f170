//! Trip repository port.
//!
//! A trip is stored as one document including its saved items, so a save
//! or removal of a flight is a single versioned update of the trip.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TripId, UserId};
use crate::domain::trip::Trip;

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn insert(&self, trip: &Trip) -> Result<(), DomainError>;

    /// Persist changes if the stored version still equals `trip.version()`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` when the stored version moved on
    /// - `TripNotFound` when the trip was deleted
    async fn update(&self, trip: &Trip) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `TripNotFound` if nothing was deleted
    async fn delete(&self, id: &TripId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError>;

    /// The user's trips, newest first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Trip>, DomainError>;
}
