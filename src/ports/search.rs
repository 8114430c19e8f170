//! Search provider ports.
//!
//! One port per provider kind. Adapters call the upstream API once per
//! request; there are no retries and no caching.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::search::{
    AccommodationOffer, AccommodationQuery, FlightOffer, FlightQuery, PlaceQuery, PlaceResult,
};

#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, SearchError>;
}

#[async_trait]
pub trait AccommodationSearch: Send + Sync {
    async fn search_accommodations(
        &self,
        query: &AccommodationQuery,
    ) -> Result<Vec<AccommodationOffer>, SearchError>;
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, SearchError>;
}

/// Which upstream failed; used in client-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Flight,
    Accommodation,
    Place,
}

impl SearchKind {
    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::Flight => "flight",
            SearchKind::Accommodation => "accommodation",
            SearchKind::Place => "event/place",
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    /// The upstream answered with a non-success status.
    #[error("Error from {} API: {message}", .kind.label())]
    Upstream {
        kind: SearchKind,
        status: u16,
        message: String,
        details: serde_json::Value,
    },

    /// The request was sent but nothing came back.
    #[error("No response received from {} API", .kind.label())]
    NoResponse { kind: SearchKind },

    /// The request could not be built or the answer could not be read.
    #[error("Error in setting up request to {} API: {message}", .kind.label())]
    Request { kind: SearchKind, message: String },
}
