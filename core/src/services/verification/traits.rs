//! Traits for delivery channel and status callback integration

use async_trait::async_trait;

use crate::domain::entities::verification_record::Channel;

/// Trait for SMS delivery integration
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send a text message, returning the provider message id
    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String>;

    /// Provider name for logging and telemetry
    fn provider_name(&self) -> &str;
}

/// Trait for email delivery integration
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an HTML email, returning the provider message id
    async fn send_email(
        &self,
        address: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<String, String>;

    /// Provider name for logging and telemetry
    fn provider_name(&self) -> &str;
}

/// Callback invoked after a code has been successfully verified
///
/// Lets the surrounding user-management layer mark the identifier as
/// verified. The verification itself has already succeeded at that
/// point, so callback failures are logged and never propagated.
#[async_trait]
pub trait VerificationStatusCallback: Send + Sync {
    async fn on_verified(
        &self,
        user_id: &str,
        channel: Channel,
        identifier: &str,
    ) -> Result<(), String>;
}
