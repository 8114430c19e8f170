//! CreateCheckoutSessionHandler - starts a hosted checkout for the caller.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::UserId;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, PaymentProvider, UserRepository,
};

use super::{provided, USER_NOT_FOUND};

#[derive(Debug, Clone, Default)]
pub struct CreateCheckoutSessionCommand {
    pub user_id: UserId,
    pub price_id: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Creates the processor customer on first use and remembers it on the user.
pub struct CreateCheckoutSessionHandler {
    users: Arc<dyn UserRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreateCheckoutSessionHandler {
    pub fn new(users: Arc<dyn UserRepository>, payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            users,
            payment_provider,
        }
    }

    pub async fn handle(&self, cmd: CreateCheckoutSessionCommand) -> Result<CheckoutSession, AppError> {
        let (Some(price_id), Some(success_url), Some(cancel_url)) = (
            provided(cmd.price_id),
            provided(cmd.success_url),
            provided(cmd.cancel_url),
        ) else {
            return Err(AppError::bad_request(
                "Missing required fields: priceId, success_url, cancel_url",
            ));
        };

        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        let customer_id = match user.stripe_customer_id() {
            Some(existing) => existing.to_string(),
            None => {
                let customer = self
                    .payment_provider
                    .create_customer(CreateCustomerRequest {
                        user_id: cmd.user_id,
                        email: user.email().to_string(),
                        name: Some(user.username().to_string()),
                    })
                    .await?;
                user.attach_customer(customer.id.clone());
                self.users.update(&user).await?;
                info!(user_id = %cmd.user_id, customer_id = %customer.id, "Payment customer created");
                customer.id
            }
        };

        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                user_id: cmd.user_id,
                customer_id,
                price_id,
                success_url,
                cancel_url,
            })
            .await?;

        info!(user_id = %cmd.user_id, session_id = %session.id, "Checkout session created");
        Ok(session)
    }
}
