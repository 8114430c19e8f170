//! Join and leave handlers.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{GroupId, UserId};
use crate::ports::{GroupRepository, UserRepository};

use super::{find_group, view_of, MemberView};

/// Adds the caller to a group's member list.
pub struct JoinGroupHandler {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl JoinGroupHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    /// Returns the member list after joining.
    pub async fn handle(&self, user_id: UserId, group_id: GroupId) -> Result<Vec<MemberView>, AppError> {
        let mut group = find_group(self.groups.as_ref(), &group_id).await?;
        group.join(user_id)?;
        self.groups.update(&group).await?;

        info!(group_id = %group_id, user_id = %user_id, "User joined group");
        Ok(view_of(self.users.as_ref(), group).await?.members)
    }
}

/// Removes the caller from a group. The creator cannot leave.
pub struct LeaveGroupHandler {
    groups: Arc<dyn GroupRepository>,
}

impl LeaveGroupHandler {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn handle(&self, user_id: UserId, group_id: GroupId) -> Result<(), AppError> {
        let mut group = find_group(self.groups.as_ref(), &group_id).await?;
        group.leave(&user_id)?;
        self.groups.update(&group).await?;

        info!(group_id = %group_id, user_id = %user_id, "User left group");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryGroupRepository, InMemoryUserRepository};
    use crate::application::handlers::groups::fixtures::seed_group;
    use crate::application::handlers::test_support::seed_user;

    #[tokio::test]
    async fn joining_twice_is_rejected_and_members_unchanged() {
        let users = Arc::new(InMemoryUserRepository::new());
        let groups = Arc::new(InMemoryGroupRepository::new());
        let bob = seed_user(&users, "bob").await;
        let group = seed_group(&groups, UserId::new(), "Alps Hikers").await;
        let handler = JoinGroupHandler::new(groups.clone(), users);

        let members = handler.handle(*bob.id(), *group.id()).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].user.as_ref().map(|u| u.username.as_str()), Some("bob"));

        let err = handler.handle(*bob.id(), *group.id()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "User is already a member of this group."));
        let stored = groups.find_by_id(group.id()).await.unwrap().unwrap();
        assert_eq!(stored.members().len(), 2);
    }

    #[tokio::test]
    async fn creator_cannot_leave() {
        let groups = Arc::new(InMemoryGroupRepository::new());
        let creator = UserId::new();
        let group = seed_group(&groups, creator, "Alps Hikers").await;

        let err = LeaveGroupHandler::new(groups)
            .handle(creator, *group.id())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m)
            if m == "Creator cannot leave the group. You can delete the group instead."));
    }

    #[tokio::test]
    async fn member_leaves_and_non_member_cannot() {
        let users = Arc::new(InMemoryUserRepository::new());
        let groups = Arc::new(InMemoryGroupRepository::new());
        let group = seed_group(&groups, UserId::new(), "Alps Hikers").await;
        let member = UserId::new();
        JoinGroupHandler::new(groups.clone(), users)
            .handle(member, *group.id())
            .await
            .unwrap();
        let leave = LeaveGroupHandler::new(groups.clone());

        leave.handle(member, *group.id()).await.unwrap();
        let err = leave.handle(member, *group.id()).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == "User is not a member of this group."));
        assert_eq!(groups.find_by_id(group.id()).await.unwrap().unwrap().members().len(), 1);
    }
}
