//! Application handlers.
//!
//! One command or query handler per use case, grouped by area. Handlers
//! take their ports as `Arc<dyn Port>` at construction and expose a single
//! `handle` method.

pub mod auth;
pub mod billing;
pub mod groups;
pub mod posts;
pub mod referrals;
pub mod search;
pub mod trips;

use std::collections::HashMap;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

pub use auth::{
    AuthenticateHandler, GetUserProfileHandler, LoginCommand, LoginHandler, LoginResult,
    RegisterUserCommand, RegisterUserHandler, RegisterUserResult, UpdateProfileCommand,
    UpdateProfileHandler,
};
pub use billing::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreatePortalSessionCommand,
    CreatePortalSessionHandler, GetMySubscriptionHandler, HandleStripeWebhookCommand,
    HandleStripeWebhookHandler, MySubscription,
};
pub use groups::{
    CreateGroupCommand, CreateGroupHandler, DeleteGroupHandler, GetGroupHandler, GroupView,
    JoinGroupHandler, LeaveGroupHandler, ListGroupsHandler, ListGroupsQuery, MemberView,
    UpdateGroupCommand, UpdateGroupHandler,
};
pub use posts::{
    CreatePostCommand, CreatePostHandler, DeletePostHandler, GetPostHandler, ListPostsHandler,
    ListPostsQuery, PostView, UpdatePostCommand, UpdatePostHandler,
};
pub use referrals::{GetReferralStatsHandler, ReferralStats};
pub use search::SearchTravelHandler;
pub use trips::{
    CreateTripCommand, CreateTripHandler, DeleteTripHandler, GetTripHandler, ListTripsHandler,
    NewSavedItem, RemoveSavedItemCommand, SaveItemCommand, SavedItemKey, SavedItemsHandler,
    UpdateTripCommand, UpdateTripHandler,
};

/// Public author/creator card attached to posts and groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub profile_picture_url: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            username: user.username().to_string(),
            profile_picture_url: user.profile().profile_picture_url.clone(),
        }
    }
}

/// Resolves each distinct id once. Deleted users are simply absent.
/// Ids are owned: a borrowing iterator held across the awaits breaks the
/// `Send` bound axum puts on handler futures.
pub(crate) async fn load_summaries(
    users: &dyn UserRepository,
    ids: Vec<UserId>,
) -> Result<HashMap<UserId, UserSummary>, DomainError> {
    let mut summaries = HashMap::new();
    for id in ids {
        if summaries.contains_key(&id) {
            continue;
        }
        if let Some(user) = users.find_by_id(&id).await? {
            summaries.insert(id, UserSummary::from(&user));
        }
    }
    Ok(summaries)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;

    #[tokio::test]
    async fn summaries_skip_missing_users_and_dedupe() {
        let users = InMemoryUserRepository::new();
        let alice = test_support::seed_user(&users, "alice").await;
        let ghost = UserId::new();

        let summaries = load_summaries(&users, vec![*alice.id(), ghost, *alice.id()])
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        let card = &summaries[alice.id()];
        assert_eq!(card.username, "alice");
        assert_eq!(card.profile_picture_url, "/Images/default-profile.png");
    }
}
