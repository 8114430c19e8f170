//! Travel search proxy handler.

mod search_travel;

pub use search_travel::SearchTravelHandler;
