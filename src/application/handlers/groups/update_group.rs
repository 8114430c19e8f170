//! UpdateGroupHandler - creator edits group settings.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{GroupId, OwnedByUser, UserId};
use crate::domain::group::GroupSettingsUpdate;
use crate::ports::{GroupRepository, UserRepository};

use super::{find_group, name_clash, view_of, GroupView};

#[derive(Debug, Clone)]
pub struct UpdateGroupCommand {
    pub user_id: UserId,
    pub group_id: GroupId,
    pub update: GroupSettingsUpdate,
}

pub struct UpdateGroupHandler {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl UpdateGroupHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    pub async fn handle(&self, cmd: UpdateGroupCommand) -> Result<GroupView, AppError> {
        let mut group = find_group(self.groups.as_ref(), &cmd.group_id).await?;
        group.check_ownership(&cmd.user_id, "update")?;

        group.update_settings(cmd.update)?;
        self.groups.update(&group).await.map_err(name_clash)?;

        info!(group_id = %cmd.group_id, "Group updated");
        let version = group.version() + 1;
        view_of(self.users.as_ref(), group.with_version(version)).await
    }
}
