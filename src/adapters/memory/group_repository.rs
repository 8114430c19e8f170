use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, GroupId, Page, PageRequest, UserId};
use crate::domain::group::TravelGroup;
use crate::ports::GroupRepository;

use super::{check_version, newest_first, Stored};

/// Group store with a unique group name.
#[derive(Debug, Default)]
pub struct InMemoryGroupRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    groups: HashMap<GroupId, Stored<TravelGroup>>,
    next_seq: u64,
}

impl State {
    fn name_taken(&self, group: &TravelGroup) -> bool {
        self.groups
            .values()
            .any(|s| s.doc.id() != group.id() && s.doc.name() == group.name())
    }
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn insert(&self, group: &TravelGroup) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.groups.contains_key(group.id()) {
            return Err(DomainError::duplicate("id"));
        }
        if state.name_taken(group) {
            return Err(DomainError::duplicate("name"));
        }
        state.next_seq += 1;
        let seq = state.next_seq;
        state.groups.insert(
            *group.id(),
            Stored {
                doc: group.clone(),
                seq,
            },
        );
        Ok(())
    }

    async fn update(&self, group: &TravelGroup) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.name_taken(group) {
            return Err(DomainError::duplicate("name"));
        }
        let stored = state
            .groups
            .get_mut(group.id())
            .ok_or_else(|| DomainError::new(ErrorCode::GroupNotFound, "Group not found."))?;
        check_version("Group", stored.doc.version(), group.version())?;
        stored.doc = group.clone().with_version(group.version() + 1);
        Ok(())
    }

    async fn delete(&self, id: &GroupId) -> Result<(), DomainError> {
        self.state.write().await.groups.remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<TravelGroup>, DomainError> {
        Ok(self.state.read().await.groups.get(id).map(|s| s.doc.clone()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<TravelGroup>, DomainError> {
        let state = self.state.read().await;
        let rows = state.groups.values().collect();
        Ok(Page::from_sorted(
            newest_first(rows, |g: &TravelGroup| *g.created_at()),
            page,
        ))
    }

    async fn list_by_creator(
        &self,
        creator: &UserId,
        page: PageRequest,
    ) -> Result<Page<TravelGroup>, DomainError> {
        let state = self.state.read().await;
        let rows = state
            .groups
            .values()
            .filter(|s| s.doc.creator() == creator)
            .collect();
        Ok(Page::from_sorted(
            newest_first(rows, |g: &TravelGroup| *g.created_at()),
            page,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::GroupSettings;

    fn group(creator: UserId, name: &str) -> TravelGroup {
        let settings = GroupSettings::new(name, None, None, None).unwrap();
        TravelGroup::create(GroupId::new(), creator, settings)
    }

    #[tokio::test]
    async fn group_names_are_unique() {
        let repo = InMemoryGroupRepository::new();
        repo.insert(&group(UserId::new(), "Backpackers")).await.unwrap();

        let err = repo.insert(&group(UserId::new(), "Backpackers")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(err.detail("field"), Some("name"));
    }

    #[tokio::test]
    async fn join_persists_with_new_version() {
        let repo = InMemoryGroupRepository::new();
        let mut g = group(UserId::new(), "Hikers");
        repo.insert(&g).await.unwrap();

        let joiner = UserId::new();
        g.join(joiner).unwrap();
        repo.update(&g).await.unwrap();

        let stored = repo.find_by_id(g.id()).await.unwrap().unwrap();
        assert!(stored.is_member(&joiner));
        assert_eq!(stored.members().len(), 2);
        assert_eq!(stored.version(), 2);
    }

    #[tokio::test]
    async fn lists_by_creator() {
        let repo = InMemoryGroupRepository::new();
        let creator = UserId::new();
        repo.insert(&group(creator, "One")).await.unwrap();
        repo.insert(&group(UserId::new(), "Two")).await.unwrap();

        let page = repo.list_by_creator(&creator, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name(), "One");
        assert_eq!(repo.list(PageRequest::default()).await.unwrap().total, 2);
    }
}
