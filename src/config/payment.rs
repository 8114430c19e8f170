//! Stripe credentials

use serde::Deserialize;

use super::error::ValidationError;

/// Which Stripe account mode the secret key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeMode {
    Test,
    Live,
}

/// Keys for checkout, the customer portal, and webhook verification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Secret API key, `sk_test_...` or `sk_live_...`
    pub stripe_secret_key: String,

    /// Endpoint signing secret, `whsec_...`
    pub stripe_webhook_secret: String,

    /// Alternate API host; integration tests point this at a mock server
    pub stripe_api_base_url: Option<String>,

    /// Acknowledge but ignore test-mode events
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Mode implied by the key prefix; `None` for restricted or unknown keys.
    pub fn mode(&self) -> Option<StripeMode> {
        if self.stripe_secret_key.starts_with("sk_live_") {
            Some(StripeMode::Live)
        } else if self.stripe_secret_key.starts_with("sk_test_") {
            Some(StripeMode::Test)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        match self.mode() {
            None => return Err(ValidationError::InvalidStripeKey),
            // Live-only webhooks with a test key would drop every event.
            Some(StripeMode::Test) if self.require_livemode => {
                return Err(ValidationError::InvalidStripeKey)
            }
            Some(_) => {}
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret_key: &str, webhook_secret: &str) -> PaymentConfig {
        PaymentConfig {
            stripe_secret_key: secret_key.to_string(),
            stripe_webhook_secret: webhook_secret.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn mode_follows_key_prefix() {
        assert_eq!(keys("sk_test_123", "whsec_1").mode(), Some(StripeMode::Test));
        assert_eq!(keys("sk_live_123", "whsec_1").mode(), Some(StripeMode::Live));
        assert_eq!(keys("rk_live_123", "whsec_1").mode(), None);
    }

    #[test]
    fn both_secrets_are_required() {
        assert_eq!(
            keys("", "whsec_1").validate(),
            Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"))
        );
        assert_eq!(
            keys("sk_test_123", "").validate(),
            Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"))
        );
    }

    #[test]
    fn publishable_key_is_not_a_secret_key() {
        assert_eq!(
            keys("pk_test_123", "whsec_1").validate(),
            Err(ValidationError::InvalidStripeKey)
        );
    }

    #[test]
    fn webhook_secret_needs_its_prefix() {
        assert_eq!(
            keys("sk_test_123", "signing-secret").validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        );
    }

    #[test]
    fn live_only_webhooks_need_a_live_key() {
        let mut config = keys("sk_test_123", "whsec_1");
        config.require_livemode = true;
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeKey));

        config.stripe_secret_key = "sk_live_123".to_string();
        assert!(config.validate().is_ok());
    }
}
