use std::sync::Arc;

use crate::application::AppError;
use crate::domain::foundation::GroupId;
use crate::ports::{GroupRepository, UserRepository};

use super::{find_group, view_of, GroupView};

/// Public single-group read with creator and member cards.
pub struct GetGroupHandler {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl GetGroupHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    pub async fn handle(&self, group_id: GroupId) -> Result<GroupView, AppError> {
        let group = find_group(self.groups.as_ref(), &group_id).await?;
        view_of(self.users.as_ref(), group).await
    }
}
