//! Referral tracking between users.

mod aggregate;

pub use aggregate::{Referral, ReferralStatus};
