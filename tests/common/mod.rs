//! Shared harness: the full router over in-memory adapters.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use budget_backpack::adapters::auth::{BcryptPasswordHasher, JwtTokenService};
use budget_backpack::adapters::http::{build_router, AppState};
use budget_backpack::adapters::memory::{
    InMemoryGroupRepository, InMemoryPostRepository, InMemoryReferralRepository,
    InMemorySubscriptionRepository, InMemoryTripRepository, InMemoryUserRepository,
    InMemoryWebhookEventRepository,
};
use budget_backpack::adapters::rate_limiter::InMemoryRateLimiter;
use budget_backpack::adapters::stripe::MockPaymentProvider;
use budget_backpack::config::{Environment, RateLimitConfig, ServerConfig, WindowLimit};
use budget_backpack::domain::billing::StripeWebhookVerifier;
use budget_backpack::domain::search::{
    AccommodationOffer, AccommodationQuery, FlightOffer, FlightQuery, PlaceQuery, PlaceResult,
};
use budget_backpack::ports::{AccommodationSearch, FlightSearch, PlaceSearch, SearchError};

pub const JWT_SECRET: &str = "integration-test-secret-with-32-chars!";
pub const WEBHOOK_SECRET: &str = "whsec_integration";

/// Records the origin of each flight query and returns no offers.
#[derive(Default)]
pub struct StubSearch {
    pub flight_origins: Mutex<Vec<String>>,
}

#[async_trait]
impl FlightSearch for StubSearch {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, SearchError> {
        self.flight_origins
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(query.origin.clone());
        Ok(Vec::new())
    }
}

#[async_trait]
impl AccommodationSearch for StubSearch {
    async fn search_accommodations(
        &self,
        _query: &AccommodationQuery,
    ) -> Result<Vec<AccommodationOffer>, SearchError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl PlaceSearch for StubSearch {
    async fn search_places(&self, _query: &PlaceQuery) -> Result<Vec<PlaceResult>, SearchError> {
        Ok(Vec::new())
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub trips: Arc<InMemoryTripRepository>,
    pub groups: Arc<InMemoryGroupRepository>,
    pub subscriptions: Arc<InMemorySubscriptionRepository>,
    pub webhook_events: Arc<InMemoryWebhookEventRepository>,
    pub payments: Arc<MockPaymentProvider>,
    pub search: Arc<StubSearch>,
}

/// Budgets large enough that ordinary tests never trip them.
pub fn relaxed_limits() -> RateLimitConfig {
    let roomy = WindowLimit {
        max_requests: 10_000,
        window_secs: 60,
    };
    RateLimitConfig {
        general: roomy,
        auth: roomy,
        search: roomy,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_rate_limits(relaxed_limits())
    }

    pub fn with_rate_limits(limits: RateLimitConfig) -> Self {
        Self::build(limits, ServerConfig::default())
    }

    pub fn with_body_limit(bytes: usize) -> Self {
        let server = ServerConfig {
            body_limit_bytes: bytes,
            ..Default::default()
        };
        Self::build(relaxed_limits(), server)
    }

    fn build(limits: RateLimitConfig, server: ServerConfig) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let trips = Arc::new(InMemoryTripRepository::new());
        let groups = Arc::new(InMemoryGroupRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let webhook_events = Arc::new(InMemoryWebhookEventRepository::new());
        let payments = Arc::new(MockPaymentProvider::new());
        let search = Arc::new(StubSearch::default());

        let state = AppState {
            users: users.clone(),
            trips: trips.clone(),
            posts: Arc::new(InMemoryPostRepository::new()),
            groups: groups.clone(),
            referrals: Arc::new(InMemoryReferralRepository::new()),
            subscriptions: subscriptions.clone(),
            webhook_events: webhook_events.clone(),
            payment_provider: payments.clone(),
            flights: search.clone(),
            accommodations: search.clone(),
            places: search.clone(),
            password_hasher: Arc::new(BcryptPasswordHasher::new(4)),
            tokens: Arc::new(JwtTokenService::new(JWT_SECRET, 5)),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(limits)),
            webhook_verifier: StripeWebhookVerifier::new(WEBHOOK_SECRET),
            require_livemode: false,
            environment: Environment::Development,
        };

        Self {
            router: build_router(state, &server),
            users,
            trips,
            groups,
            subscriptions,
            webhook_events,
            payments,
            search,
        }
    }

    /// Sends a request and decodes the JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Registers `username` with a valid password and returns the token.
    pub async fn register(&self, username: &str, email: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": "Abc123!"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Id of the caller behind `token`.
    pub async fn me(&self, token: &str) -> Value {
        let (status, body) = self.send("GET", "/api/auth/me", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}
