use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{GroupId, OwnedByUser, UserId};
use crate::ports::GroupRepository;

use super::find_group;

/// Deletes a group; only its creator may.
pub struct DeleteGroupHandler {
    groups: Arc<dyn GroupRepository>,
}

impl DeleteGroupHandler {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn handle(&self, user_id: UserId, group_id: GroupId) -> Result<(), AppError> {
        let group = find_group(self.groups.as_ref(), &group_id).await?;
        group.check_ownership(&user_id, "delete")?;
        self.groups.delete(&group_id).await?;

        info!(group_id = %group_id, user_id = %user_id, "Group deleted");
        Ok(())
    }
}
