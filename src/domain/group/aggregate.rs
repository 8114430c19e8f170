//! Travel group aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, GroupId, OwnedByUser, Timestamp, UserId, ValidationError,
};

pub const GROUP_NAME_MAX: usize = 100;
pub const GROUP_DESCRIPTION_MAX: usize = 500;
pub const DEFAULT_GROUP_COVER: &str = "/Images/default-group-cover.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user: UserId,
    pub joined_at: Timestamp,
}

/// Validated group settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSettings {
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub cover_image_url: String,
}

/// Partial settings edit.
#[derive(Debug, Clone, Default)]
pub struct GroupSettingsUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub cover_image_url: Option<String>,
}

impl GroupSettings {
    pub fn new(
        name: &str,
        description: Option<&str>,
        is_public: Option<bool>,
        cover_image_url: Option<&str>,
    ) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let name = validate_name(name, &mut errors);
        let description = validate_description(description.unwrap_or(""), &mut errors);
        match (name, description) {
            (Some(name), Some(description)) if errors.is_empty() => Ok(Self {
                name,
                description,
                is_public: is_public.unwrap_or(true),
                cover_image_url: cover(cover_image_url),
            }),
            _ => Err(errors),
        }
    }

    pub fn merge(&self, update: GroupSettingsUpdate) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut next = self.clone();
        if let Some(name) = update.name {
            if let Some(v) = validate_name(&name, &mut errors) {
                next.name = v;
            }
        }
        if let Some(description) = update.description {
            if let Some(v) = validate_description(&description, &mut errors) {
                next.description = v;
            }
        }
        if let Some(is_public) = update.is_public {
            next.is_public = is_public;
        }
        if let Some(url) = update.cover_image_url {
            next.cover_image_url = cover(Some(&url));
        }
        if errors.is_empty() {
            Ok(next)
        } else {
            Err(errors)
        }
    }
}

fn validate_name(raw: &str, errors: &mut Vec<ValidationError>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(ValidationError::empty_field("name", "Group name is required."));
        return None;
    }
    if trimmed.chars().count() > GROUP_NAME_MAX {
        errors.push(ValidationError::out_of_range(
            "name",
            "Group name cannot exceed 100 characters.",
        ));
        return None;
    }
    Some(trimmed.to_string())
}

fn validate_description(raw: &str, errors: &mut Vec<ValidationError>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > GROUP_DESCRIPTION_MAX {
        errors.push(ValidationError::out_of_range(
            "description",
            "Group description cannot exceed 500 characters.",
        ));
        return None;
    }
    Some(trimmed.to_string())
}

fn cover(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_GROUP_COVER)
        .to_string()
}

/// A named group of travellers.
///
/// # Invariants
///
/// - `name` is unique across groups (enforced by the store)
/// - the creator is always a member and cannot leave
/// - a user appears at most once in `members`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelGroup {
    id: GroupId,
    creator: UserId,
    settings: GroupSettings,
    members: Vec<GroupMember>,
    created_at: Timestamp,
    updated_at: Timestamp,
    version: i64,
}

impl TravelGroup {
    pub fn create(id: GroupId, creator: UserId, settings: GroupSettings) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            creator,
            settings,
            members: vec![GroupMember {
                user: creator,
                joined_at: now,
            }],
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: GroupId,
        creator: UserId,
        settings: GroupSettings,
        members: Vec<GroupMember>,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            creator,
            settings,
            members,
            created_at,
            updated_at,
            version,
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn creator(&self) -> &UserId {
        &self.creator
    }

    pub fn settings(&self) -> &GroupSettings {
        &self.settings
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| &m.user == user_id)
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Copy carrying the version a store assigned after a conditional write.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn update_settings(&mut self, update: GroupSettingsUpdate) -> Result<(), Vec<ValidationError>> {
        self.settings = self.settings.merge(update)?;
        self.touch();
        Ok(())
    }

    pub fn join(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.is_member(&user_id) {
            return Err(DomainError::rule("User is already a member of this group."));
        }
        self.members.push(GroupMember {
            user: user_id,
            joined_at: Timestamp::now(),
        });
        self.touch();
        Ok(())
    }

    pub fn leave(&mut self, user_id: &UserId) -> Result<(), DomainError> {
        if &self.creator == user_id {
            return Err(DomainError::rule(
                "Creator cannot leave the group. You can delete the group instead.",
            ));
        }
        if !self.is_member(user_id) {
            return Err(DomainError::rule("User is not a member of this group."));
        }
        self.members.retain(|m| &m.user != user_id);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByUser for TravelGroup {
    fn owner_id(&self) -> &UserId {
        &self.creator
    }

    fn resource_name(&self) -> &'static str {
        "group"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn group() -> TravelGroup {
        let settings = GroupSettings::new(" Alps Hikers ", None, None, None).unwrap();
        TravelGroup::create(GroupId::new(), UserId::new(), settings)
    }

    #[test]
    fn creator_is_first_member() {
        let g = group();
        assert_eq!(g.members().len(), 1);
        assert!(g.is_member(g.creator()));
        assert_eq!(g.name(), "Alps Hikers");
        assert!(g.settings().is_public);
        assert_eq!(g.settings().cover_image_url, DEFAULT_GROUP_COVER);
    }

    #[test]
    fn joining_twice_is_rejected_and_members_unchanged() {
        let mut g = group();
        let user = UserId::new();
        g.join(user).unwrap();

        let err = g.join(user).unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleViolation);
        assert_eq!(err.message, "User is already a member of this group.");
        assert_eq!(g.members().len(), 2);
    }

    #[test]
    fn creator_cannot_leave() {
        let mut g = group();
        let creator = *g.creator();
        let err = g.leave(&creator).unwrap_err();
        assert_eq!(
            err.message,
            "Creator cannot leave the group. You can delete the group instead."
        );
    }

    #[test]
    fn non_member_cannot_leave() {
        let mut g = group();
        let err = g.leave(&UserId::new()).unwrap_err();
        assert_eq!(err.message, "User is not a member of this group.");
    }

    #[test]
    fn member_can_leave() {
        let mut g = group();
        let user = UserId::new();
        g.join(user).unwrap();
        g.leave(&user).unwrap();
        assert!(!g.is_member(&user));
    }

    #[test]
    fn name_is_required() {
        let errors = GroupSettings::new("  ", None, None, None).unwrap_err();
        assert_eq!(errors[0].message(), "Group name is required.");
    }

    #[test]
    fn long_description_is_rejected() {
        let long = "d".repeat(501);
        let errors = GroupSettings::new("Name", Some(&long), None, None).unwrap_err();
        assert_eq!(errors[0].field(), "description");
    }

    #[test]
    fn update_settings_merges() {
        let mut g = group();
        g.update_settings(GroupSettingsUpdate {
            description: Some("Weekend trips".into()),
            is_public: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(g.name(), "Alps Hikers");
        assert_eq!(g.settings().description, "Weekend trips");
        assert!(!g.settings().is_public);
    }
}
