//! Referral program handlers.

mod get_referral_stats;

pub use get_referral_stats::{GetReferralStatsHandler, ReferralStats};
