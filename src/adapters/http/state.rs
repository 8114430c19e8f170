//! Shared application state.

use std::sync::Arc;

use crate::application::handlers::{
    AuthenticateHandler, CreateCheckoutSessionHandler, CreateGroupHandler, CreatePortalSessionHandler,
    CreatePostHandler, CreateTripHandler, DeleteGroupHandler, DeletePostHandler, DeleteTripHandler,
    GetGroupHandler, GetMySubscriptionHandler, GetPostHandler, GetReferralStatsHandler, GetTripHandler,
    GetUserProfileHandler, HandleStripeWebhookHandler, JoinGroupHandler, LeaveGroupHandler,
    ListGroupsHandler, ListPostsHandler, ListTripsHandler, LoginHandler, RegisterUserHandler,
    SavedItemsHandler, SearchTravelHandler, UpdateGroupHandler, UpdatePostHandler,
    UpdateProfileHandler, UpdateTripHandler,
};
use crate::config::Environment;
use crate::domain::billing::StripeWebhookVerifier;
use crate::ports::{
    AccommodationSearch, FlightSearch, GroupRepository, PasswordHasher, PaymentProvider, PlaceSearch,
    PostRepository, RateLimiter, ReferralRepository, SubscriptionRepository, TokenService,
    TripRepository, UserRepository, WebhookEventRepository,
};

/// Everything a request handler may need.
///
/// Cloned per request; every dependency is behind an `Arc`. Application
/// handlers are built on demand from the ports.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub referrals: Arc<dyn ReferralRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub flights: Arc<dyn FlightSearch>,
    pub accommodations: Arc<dyn AccommodationSearch>,
    pub places: Arc<dyn PlaceSearch>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub webhook_verifier: StripeWebhookVerifier,
    pub require_livemode: bool,
    pub environment: Environment,
}

impl AppState {
    // ════════════════════════════════════════════════════════════════════════
    // Identity
    // ════════════════════════════════════════════════════════════════════════

    pub fn authenticate_handler(&self) -> AuthenticateHandler {
        AuthenticateHandler::new(self.users.clone(), self.tokens.clone())
    }

    pub fn register_handler(&self) -> RegisterUserHandler {
        RegisterUserHandler::new(
            self.users.clone(),
            self.referrals.clone(),
            self.password_hasher.clone(),
            self.tokens.clone(),
        )
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.password_hasher.clone(), self.tokens.clone())
    }

    pub fn get_profile_handler(&self) -> GetUserProfileHandler {
        GetUserProfileHandler::new(self.users.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(self.users.clone())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Trips
    // ════════════════════════════════════════════════════════════════════════

    pub fn create_trip_handler(&self) -> CreateTripHandler {
        CreateTripHandler::new(self.trips.clone())
    }

    pub fn get_trip_handler(&self) -> GetTripHandler {
        GetTripHandler::new(self.trips.clone())
    }

    pub fn list_trips_handler(&self) -> ListTripsHandler {
        ListTripsHandler::new(self.trips.clone())
    }

    pub fn update_trip_handler(&self) -> UpdateTripHandler {
        UpdateTripHandler::new(self.trips.clone())
    }

    pub fn delete_trip_handler(&self) -> DeleteTripHandler {
        DeleteTripHandler::new(self.trips.clone())
    }

    pub fn saved_items_handler(&self) -> SavedItemsHandler {
        SavedItemsHandler::new(self.trips.clone())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Search
    // ════════════════════════════════════════════════════════════════════════

    pub fn search_handler(&self) -> SearchTravelHandler {
        SearchTravelHandler::new(self.flights.clone(), self.accommodations.clone(), self.places.clone())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Billing and referrals
    // ════════════════════════════════════════════════════════════════════════

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(self.users.clone(), self.payment_provider.clone())
    }

    pub fn portal_handler(&self) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(self.users.clone(), self.payment_provider.clone())
    }

    pub fn my_subscription_handler(&self) -> GetMySubscriptionHandler {
        GetMySubscriptionHandler::new(self.users.clone(), self.subscriptions.clone())
    }

    pub fn webhook_handler(&self) -> HandleStripeWebhookHandler {
        HandleStripeWebhookHandler::new(
            self.subscriptions.clone(),
            self.users.clone(),
            self.referrals.clone(),
            self.webhook_events.clone(),
            self.payment_provider.clone(),
            self.webhook_verifier.clone(),
            self.require_livemode,
        )
    }

    pub fn referral_stats_handler(&self) -> GetReferralStatsHandler {
        GetReferralStatsHandler::new(self.users.clone(), self.referrals.clone())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Social
    // ════════════════════════════════════════════════════════════════════════

    pub fn create_post_handler(&self) -> CreatePostHandler {
        CreatePostHandler::new(self.posts.clone(), self.users.clone())
    }

    pub fn get_post_handler(&self) -> GetPostHandler {
        GetPostHandler::new(self.posts.clone(), self.users.clone())
    }

    pub fn list_posts_handler(&self) -> ListPostsHandler {
        ListPostsHandler::new(self.posts.clone(), self.users.clone())
    }

    pub fn update_post_handler(&self) -> UpdatePostHandler {
        UpdatePostHandler::new(self.posts.clone(), self.users.clone())
    }

    pub fn delete_post_handler(&self) -> DeletePostHandler {
        DeletePostHandler::new(self.posts.clone())
    }

    pub fn create_group_handler(&self) -> CreateGroupHandler {
        CreateGroupHandler::new(self.groups.clone(), self.users.clone())
    }

    pub fn get_group_handler(&self) -> GetGroupHandler {
        GetGroupHandler::new(self.groups.clone(), self.users.clone())
    }

    pub fn list_groups_handler(&self) -> ListGroupsHandler {
        ListGroupsHandler::new(self.groups.clone(), self.users.clone())
    }

    pub fn update_group_handler(&self) -> UpdateGroupHandler {
        UpdateGroupHandler::new(self.groups.clone(), self.users.clone())
    }

    pub fn delete_group_handler(&self) -> DeleteGroupHandler {
        DeleteGroupHandler::new(self.groups.clone())
    }

    pub fn join_group_handler(&self) -> JoinGroupHandler {
        JoinGroupHandler::new(self.groups.clone(), self.users.clone())
    }

    pub fn leave_group_handler(&self) -> LeaveGroupHandler {
        LeaveGroupHandler::new(self.groups.clone())
    }
}
