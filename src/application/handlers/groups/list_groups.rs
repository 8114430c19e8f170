//! ListGroupsHandler - paginated directory, optionally by creator.

use std::sync::Arc;

use crate::application::AppError;
use crate::domain::foundation::{Page, PageRequest, UserId};
use crate::ports::{GroupRepository, UserRepository};

use super::{views_of, GroupView};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListGroupsQuery {
    /// Restrict to groups this user created; the user must exist.
    pub creator: Option<UserId>,
    pub page: PageRequest,
}

pub struct ListGroupsHandler {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl ListGroupsHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    pub async fn handle(&self, query: ListGroupsQuery) -> Result<Page<GroupView>, AppError> {
        let page = match query.creator {
            Some(creator) => {
                if self.users.find_by_id(&creator).await?.is_none() {
                    return Err(AppError::not_found("User not found."));
                }
                self.groups.list_by_creator(&creator, query.page).await?
            }
            None => self.groups.list(query.page).await?,
        };
        views_of(self.users.as_ref(), page).await
    }
}
