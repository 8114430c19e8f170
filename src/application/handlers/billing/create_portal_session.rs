//! CreatePortalSessionHandler - opens the processor's self-service portal.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::UserId;
use crate::ports::{PaymentProvider, PortalSession, UserRepository};

use super::{provided, USER_NOT_FOUND};

#[derive(Debug, Clone)]
pub struct CreatePortalSessionCommand {
    pub user_id: UserId,
    pub return_url: Option<String>,
}

pub struct CreatePortalSessionHandler {
    users: Arc<dyn UserRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePortalSessionHandler {
    pub fn new(users: Arc<dyn UserRepository>, payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            users,
            payment_provider,
        }
    }

    pub async fn handle(&self, cmd: CreatePortalSessionCommand) -> Result<PortalSession, AppError> {
        let return_url = provided(cmd.return_url)
            .ok_or_else(|| AppError::bad_request("Missing required field: return_url"))?;

        let user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        let customer_id = user.stripe_customer_id().ok_or_else(|| {
            AppError::not_found(
                "Stripe customer ID not found for this user. No active subscription to manage.",
            )
        })?;

        let session = self
            .payment_provider
            .create_portal_session(customer_id, &return_url)
            .await?;
        info!(user_id = %cmd.user_id, "Portal session created");
        Ok(session)
    }
}
