//! Budget BackPack API server.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use budget_backpack::adapters::auth::{BcryptPasswordHasher, JwtTokenService};
use budget_backpack::adapters::http::{build_router, AppState};
use budget_backpack::adapters::postgres::{
    PostgresGroupRepository, PostgresPostRepository, PostgresReferralRepository,
    PostgresSubscriptionRepository, PostgresTripRepository, PostgresUserRepository,
    PostgresWebhookEventRepository,
};
use budget_backpack::adapters::rate_limiter::{InMemoryRateLimiter, RedisRateLimiter};
use budget_backpack::adapters::search::{
    base_url, AirbnbAccommodationSearch, GooglePlacesSearch, KiwiFlightSearch, RapidApiClient,
};
use budget_backpack::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use budget_backpack::config::AppConfig;
use budget_backpack::domain::billing::StripeWebhookVerifier;
use budget_backpack::ports::RateLimiter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(
        environment = %config.server.environment,
        stripe_mode = ?config.payment.mode(),
        "Starting Budget BackPack API"
    );

    let pool = connect_database(&config).await?;
    let state = build_state(&config, pool).await?;
    let app = build_router(state, &config.server);

    let addr = config.server.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level. JSON lines in production.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }
}

async fn connect_database(config: &AppConfig) -> Result<PgPool, Box<dyn std::error::Error>> {
    info!(url = %config.database.redacted_url(), "Connecting to PostgreSQL");
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }
    Ok(pool)
}

async fn build_rate_limiter(config: &AppConfig) -> Arc<dyn RateLimiter> {
    let Some(redis) = &config.redis else {
        info!("Rate limiting with in-process counters");
        return Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));
    };

    let connect = RedisRateLimiter::connect(&redis.url, config.rate_limit.clone(), redis.key_prefix.clone());
    match tokio::time::timeout(redis.connect_timeout(), connect).await {
        Ok(Ok(limiter)) => {
            info!("Rate limiting with Redis counters");
            Arc::new(limiter)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Redis unavailable, falling back to in-process rate limiting");
            Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()))
        }
        Err(_) => {
            warn!("Redis connection timed out, falling back to in-process rate limiting");
            Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()))
        }
    }
}

async fn build_state(config: &AppConfig, pool: PgPool) -> Result<AppState, Box<dyn std::error::Error>> {
    let search = &config.search;
    let rapidapi = RapidApiClient::new(search.rapidapi_key.clone(), search.request_timeout())?;
    let stripe = StripePaymentAdapter::new(StripeConfig::from_payment_config(&config.payment))?;

    Ok(AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        trips: Arc::new(PostgresTripRepository::new(pool.clone())),
        posts: Arc::new(PostgresPostRepository::new(pool.clone())),
        groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
        referrals: Arc::new(PostgresReferralRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool)),
        payment_provider: Arc::new(stripe),
        flights: Arc::new(KiwiFlightSearch::new(
            rapidapi.clone(),
            search.flight_host.clone(),
            base_url(&search.flight_host, None),
        )),
        accommodations: Arc::new(AirbnbAccommodationSearch::new(
            rapidapi.clone(),
            search.accommodation_host.clone(),
            base_url(&search.accommodation_host, None),
        )),
        places: Arc::new(GooglePlacesSearch::new(
            rapidapi,
            search.places_host.clone(),
            base_url(&search.places_host, None),
        )),
        password_hasher: Arc::new(BcryptPasswordHasher::new(config.auth.bcrypt_cost)),
        tokens: Arc::new(JwtTokenService::from_config(&config.auth)),
        rate_limiter: build_rate_limiter(config).await,
        webhook_verifier: StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.clone()),
        require_livemode: config.payment.require_livemode,
        environment: config.server.environment,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
