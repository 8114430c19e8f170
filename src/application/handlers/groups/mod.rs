//! Travel group handlers.

mod create_group;
mod delete_group;
mod get_group;
mod list_groups;
mod membership;
mod update_group;

pub use create_group::{CreateGroupCommand, CreateGroupHandler};
pub use delete_group::DeleteGroupHandler;
pub use get_group::GetGroupHandler;
pub use list_groups::{ListGroupsHandler, ListGroupsQuery};
pub use membership::{JoinGroupHandler, LeaveGroupHandler};
pub use update_group::{UpdateGroupCommand, UpdateGroupHandler};

use crate::application::AppError;
use crate::domain::foundation::{DomainError, ErrorCode, GroupId, Page, Timestamp, UserId};
use crate::domain::group::TravelGroup;
use crate::ports::{GroupRepository, UserRepository};

use super::{load_summaries, UserSummary};

const GROUP_NOT_FOUND: &str = "Group not found.";
const DUPLICATE_NAME: &str = "A group with this name already exists.";

/// A member entry resolved to a user card.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberView {
    pub user_id: UserId,
    pub user: Option<UserSummary>,
    pub joined_at: Timestamp,
}

/// A group with creator and member cards.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub group: TravelGroup,
    pub creator: Option<UserSummary>,
    pub members: Vec<MemberView>,
}

async fn view_of(users: &dyn UserRepository, group: TravelGroup) -> Result<GroupView, AppError> {
    let ids: Vec<UserId> = std::iter::once(*group.creator())
        .chain(group.members().iter().map(|m| m.user))
        .collect();
    let cards = load_summaries(users, ids).await?;
    Ok(assemble(group, &cards))
}

async fn views_of(
    users: &dyn UserRepository,
    page: Page<TravelGroup>,
) -> Result<Page<GroupView>, AppError> {
    let ids: Vec<UserId> = page
        .items
        .iter()
        .flat_map(|g| std::iter::once(*g.creator()).chain(g.members().iter().map(|m| m.user)))
        .collect();
    let cards = load_summaries(users, ids).await?;
    Ok(page.map(|group| assemble(group, &cards)))
}

fn assemble(
    group: TravelGroup,
    cards: &std::collections::HashMap<UserId, UserSummary>,
) -> GroupView {
    let members = group
        .members()
        .iter()
        .map(|m| MemberView {
            user_id: m.user,
            user: cards.get(&m.user).cloned(),
            joined_at: m.joined_at,
        })
        .collect();
    GroupView {
        creator: cards.get(group.creator()).cloned(),
        members,
        group,
    }
}

async fn find_group(groups: &dyn GroupRepository, group_id: &GroupId) -> Result<TravelGroup, AppError> {
    groups
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| AppError::not_found(GROUP_NOT_FOUND))
}

/// Group names are unique; the store reports the clash on `name`.
fn name_clash(err: DomainError) -> AppError {
    if err.code == ErrorCode::Duplicate && err.detail("field") == Some("name") {
        AppError::Conflict(DUPLICATE_NAME.into())
    } else {
        err.into()
    }
}
