//! User accounts: credentials, tier, referral code and public profile.

mod aggregate;
mod credentials;
mod profile;
mod referral_code;
mod tier;

pub use aggregate::User;
pub use credentials::{require_password, Email, NewPassword, Username};
pub use profile::{Profile, ProfileUpdate, DEFAULT_PROFILE_PICTURE};
pub use referral_code::ReferralCode;
pub use tier::Tier;
