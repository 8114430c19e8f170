//! Travel groups and membership.

mod aggregate;

pub use aggregate::{
    GroupMember, GroupSettings, GroupSettingsUpdate, TravelGroup, DEFAULT_GROUP_COVER,
    GROUP_DESCRIPTION_MAX, GROUP_NAME_MAX,
};
